use chrono::NaiveDate;
use rand::SeedableRng;
use rand::rngs::StdRng;

use evm_forecasts::services::evm::{SplitSource, compute_metrics};
use evm_forecasts::services::monte_carlo::{ForecastModel, ITERATIONS, forecast_project_with_rng};
use evm_forecasts::services::project_yaml::load_project_from_yaml_file;
use evm_forecasts::services::simulation_types::{BinBand, ForecastParams};

const FIXTURE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/bridge_project.yaml");

#[test]
fn loads_project_and_computes_indices() {
    let project = load_project_from_yaml_file(FIXTURE).unwrap();
    assert_eq!(project.name, "Puente Norte");
    assert_eq!(project.activities.len(), 3);
    assert_eq!(project.risks.len(), 3);

    let today = NaiveDate::from_ymd_opt(2026, 3, 3).unwrap();
    let metrics = compute_metrics(
        &project.activities,
        &project.budget,
        Some(&project.resources),
        today,
    );

    assert_eq!(metrics.earned_value, 320_000.0);
    assert_eq!(metrics.planned_value, 350_000.0);
    assert!((metrics.cpi - 320.0 / 300.0).abs() < 1e-9);
    assert!((metrics.spi - 320.0 / 350.0).abs() < 1e-9);
    assert!((metrics.eac - 1_000_000.0 / metrics.cpi).abs() < 1e-6);
    assert_eq!(metrics.split_source, SplitSource::ResourceInventory);
}

#[test]
fn seeded_project_forecast_is_consistent() {
    let project = load_project_from_yaml_file(FIXTURE).unwrap();
    let as_of = NaiveDate::from_ymd_opt(2026, 3, 3).unwrap();
    let params = ForecastParams::default();
    let model = ForecastModel::default();

    let mut rng = StdRng::seed_from_u64(11);
    let output = forecast_project_with_rng(&project, &params, &model, as_of, &mut rng).unwrap();
    let report = &output.report;

    assert_eq!(output.samples.len(), ITERATIONS);
    assert!(output.samples.windows(2).all(|pair| pair[0] <= pair[1]));
    assert!(report.min <= report.percentiles.p10 && report.max >= report.percentiles.p90);
    assert!(report.percentiles.p10 <= report.percentiles.p50);
    assert!(report.percentiles.p50 <= report.percentiles.p90);
    assert_eq!(report.histogram.iter().map(|bin| bin.count).sum::<usize>(), ITERATIONS);
    assert_eq!(report.histogram.first().map(|bin| bin.band), Some(BinBand::BelowP10));
    assert_eq!(report.histogram.last().map(|bin| bin.band), Some(BinBand::AboveP90));

    let mut rng = StdRng::seed_from_u64(11);
    let again = forecast_project_with_rng(&project, &params, &model, as_of, &mut rng).unwrap();
    assert_eq!(again.report.percentiles, report.percentiles);
}
