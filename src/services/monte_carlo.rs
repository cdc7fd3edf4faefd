use chrono::NaiveDate;
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand_distr::{Bernoulli, Distribution};
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::domain::budget::BudgetContext;
use crate::domain::project::Project;
use crate::domain::risk::RiskStats;
use crate::services::evm::{MetricsSnapshot, compute_metrics};
use crate::services::histogram::{
    HISTOGRAM_BINS, HistogramError, build_histogram, write_histogram_png,
};
use crate::services::percentiles::{mean, value_f64_sorted};
use crate::services::project_yaml::{ProjectYamlError, load_project_from_yaml_file};
use crate::services::simulation_types::{
    CostPercentiles, ForecastOutput, ForecastParams, ForecastReport,
};

pub const ITERATIONS: usize = 10_000;
pub const HORIZON_MONTHS: u32 = 12;

#[derive(Error, Debug)]
pub enum ForecastError {
    #[error("failed to load project: {0}")]
    LoadProject(#[from] ProjectYamlError),
    #[error("invalid date: {0}")]
    InvalidDate(String),
    #[error("inflation must be within 0-20 percent, got {0}")]
    InvalidInflation(f64),
    #[error("import exposure must be within 0-100 percent, got {0}")]
    InvalidImportExposure(f64),
    #[error("contingency must be within 0-30 percent, got {0}")]
    InvalidContingency(f64),
    #[error("fx forward rate must be positive, got {0}")]
    InvalidFxForwardRate(f64),
    #[error("invalid forecast model: {0}")]
    InvalidModel(String),
    #[error("failed to render histogram: {0}")]
    Histogram(#[from] HistogramError),
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum InflationScaling {
    /// Month `m` costs `1 + monthly_rate * m` times the base burn.
    Linear,
    /// Month `m` costs `(1 + monthly_rate)^m` times the base burn.
    Compound,
}

/// Fixed coefficients of the forecast. `Default` is the calibrated model.
#[derive(Serialize, Debug, Clone, Copy, PartialEq)]
pub struct ForecastModel {
    pub fx_reference_rate: f64,
    pub fx_shock_probability: f64,
    pub contingency_probability: f64,
    pub inflation_scaling: InflationScaling,
}

impl Default for ForecastModel {
    fn default() -> Self {
        Self {
            fx_reference_rate: 4000.0,
            fx_shock_probability: 0.2,
            contingency_probability: 0.1,
            inflation_scaling: InflationScaling::Linear,
        }
    }
}

/// Values a forecast projects forward from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForecastInputs {
    pub as_of: NaiveDate,
    pub actual_cost: f64,
    pub base_monthly_burn: f64,
    pub risk_volatility: f64,
}

impl ForecastInputs {
    /// Burn falls back to a twelfth of the declared budget when nothing has
    /// been spent yet.
    pub fn from_metrics(
        metrics: &MetricsSnapshot,
        budget: &BudgetContext,
        risk_stats: &RiskStats,
        as_of: NaiveDate,
    ) -> Self {
        let monthly_burn = metrics.actual_cost / budget.elapsed_months(as_of);
        let base_monthly_burn = if monthly_burn > 0.0 {
            monthly_burn
        } else {
            budget.total_budget / 12.0
        };
        Self {
            as_of,
            actual_cost: metrics.actual_cost,
            base_monthly_burn,
            risk_volatility: risk_stats.volatility(),
        }
    }
}

pub fn validate_params(params: &ForecastParams) -> Result<(), ForecastError> {
    if !(0.0..=20.0).contains(&params.inflation_annual_percent) {
        return Err(ForecastError::InvalidInflation(params.inflation_annual_percent));
    }
    if !(0.0..=100.0).contains(&params.import_exposure_percent) {
        return Err(ForecastError::InvalidImportExposure(params.import_exposure_percent));
    }
    if !(0.0..=30.0).contains(&params.contingency_percent) {
        return Err(ForecastError::InvalidContingency(params.contingency_percent));
    }
    if !(params.fx_forward_rate.is_finite() && params.fx_forward_rate > 0.0) {
        return Err(ForecastError::InvalidFxForwardRate(params.fx_forward_rate));
    }
    Ok(())
}

/// Fractional cost increase of a month hit by an exchange-rate shock.
pub fn fx_impact(params: &ForecastParams, model: &ForecastModel) -> f64 {
    (params.fx_forward_rate - model.fx_reference_rate).abs() / model.fx_reference_rate
        * (params.import_exposure_percent / 100.0)
}

/// Loads a project file, forecasts its cost at completion and renders the
/// histogram to `histogram_path`.
pub fn forecast_from_project_file(
    project_path: &str,
    params: &ForecastParams,
    as_of: &str,
    seed: Option<u64>,
    histogram_path: &str,
) -> Result<ForecastOutput, ForecastError> {
    let project = load_project_from_yaml_file(project_path)?;
    let as_of = NaiveDate::parse_from_str(as_of, "%Y-%m-%d")
        .map_err(|_| ForecastError::InvalidDate(as_of.to_string()))?;

    let model = ForecastModel::default();
    let mut output = match seed {
        Some(seed) => {
            let mut rng = StdRng::seed_from_u64(seed);
            forecast_project_with_rng(&project, params, &model, as_of, &mut rng)?
        }
        None => {
            let mut rng = rand::thread_rng();
            forecast_project_with_rng(&project, params, &model, as_of, &mut rng)?
        }
    };
    output.report.data_source = data_source_name(project_path);
    write_histogram_png(histogram_path, &output.report.histogram)?;
    Ok(output)
}

pub fn forecast_project_with_rng<R: Rng + ?Sized>(
    project: &Project,
    params: &ForecastParams,
    model: &ForecastModel,
    as_of: NaiveDate,
    rng: &mut R,
) -> Result<ForecastOutput, ForecastError> {
    let metrics = compute_metrics(
        &project.activities,
        &project.budget,
        Some(&project.resources),
        as_of,
    );
    let risk_stats = RiskStats::from_risks(&project.risks);
    let inputs = ForecastInputs::from_metrics(&metrics, &project.budget, &risk_stats, as_of);
    run_monte_carlo_with_rng(&inputs, params, model, rng)
}

pub fn run_monte_carlo(
    inputs: &ForecastInputs,
    params: &ForecastParams,
    model: &ForecastModel,
) -> Result<ForecastOutput, ForecastError> {
    let mut rng = rand::thread_rng();
    run_monte_carlo_with_rng(inputs, params, model, &mut rng)
}

pub fn run_monte_carlo_with_rng<R: Rng + ?Sized>(
    inputs: &ForecastInputs,
    params: &ForecastParams,
    model: &ForecastModel,
    rng: &mut R,
) -> Result<ForecastOutput, ForecastError> {
    validate_params(params)?;
    let fx_gate = Bernoulli::new(model.fx_shock_probability)
        .map_err(|e| ForecastError::InvalidModel(format!("fx shock probability: {e}")))?;
    let contingency_gate = Bernoulli::new(model.contingency_probability)
        .map_err(|e| ForecastError::InvalidModel(format!("contingency probability: {e}")))?;
    if !(model.fx_reference_rate.is_finite() && model.fx_reference_rate > 0.0) {
        return Err(ForecastError::InvalidModel(format!(
            "fx reference rate must be positive, got {}",
            model.fx_reference_rate
        )));
    }

    let shocks = MonthlyShocks {
        monthly_inflation: params.inflation_annual_percent / 100.0 / 12.0,
        inflation_scaling: model.inflation_scaling,
        volatility: inputs.risk_volatility,
        fx_impact: fx_impact(params, model),
        fx_gate,
        contingency: params.contingency_percent / 100.0,
        contingency_gate,
    };

    let mut samples = Vec::with_capacity(ITERATIONS);
    for _ in 0..ITERATIONS {
        samples.push(simulate_single_run(inputs, &shocks, rng));
    }
    sort_samples(&mut samples);

    let percentiles = CostPercentiles {
        p10: value_f64_sorted(&samples, 10.0),
        p50: value_f64_sorted(&samples, 50.0),
        p90: value_f64_sorted(&samples, 90.0),
    };
    let histogram = build_histogram(&samples, HISTOGRAM_BINS, &percentiles);

    let report = ForecastReport {
        data_source: String::new(),
        as_of: inputs.as_of.format("%Y-%m-%d").to_string(),
        iterations: ITERATIONS,
        horizon_months: HORIZON_MONTHS,
        actual_cost: inputs.actual_cost,
        base_monthly_burn: inputs.base_monthly_burn,
        risk_volatility: inputs.risk_volatility,
        fx_impact: shocks.fx_impact,
        params: *params,
        percentiles,
        mean: mean(&samples),
        min: samples.first().copied().unwrap_or(0.0),
        max: samples.last().copied().unwrap_or(0.0),
        histogram,
    };
    debug!(
        p10 = report.percentiles.p10,
        p50 = report.percentiles.p50,
        p90 = report.percentiles.p90,
        "monte carlo run finished"
    );

    Ok(ForecastOutput { report, samples })
}

struct MonthlyShocks {
    monthly_inflation: f64,
    inflation_scaling: InflationScaling,
    volatility: f64,
    fx_impact: f64,
    fx_gate: Bernoulli,
    contingency: f64,
    contingency_gate: Bernoulli,
}

impl MonthlyShocks {
    fn inflation_factor(&self, month: u32) -> f64 {
        match self.inflation_scaling {
            InflationScaling::Linear => 1.0 + self.monthly_inflation * month as f64,
            InflationScaling::Compound => (1.0 + self.monthly_inflation).powi(month as i32),
        }
    }
}

fn simulate_single_run<R: Rng + ?Sized>(
    inputs: &ForecastInputs,
    shocks: &MonthlyShocks,
    rng: &mut R,
) -> f64 {
    let mut cost = inputs.actual_cost;
    for month in 1..=HORIZON_MONTHS {
        let z = standard_normal(rng);
        let mut monthly_cost = inputs.base_monthly_burn;
        monthly_cost *= shocks.inflation_factor(month);
        monthly_cost *= 1.0 + z * shocks.volatility;
        if shocks.fx_gate.sample(rng) {
            monthly_cost *= 1.0 + shocks.fx_impact;
        }
        if shocks.contingency_gate.sample(rng) {
            monthly_cost *= 1.0 + shocks.contingency;
        }
        cost += monthly_cost;
    }
    cost
}

/// Ascending total order; NaN sorts after +inf.
fn sort_samples(samples: &mut [f64]) {
    samples.sort_by(f64::total_cmp);
}

/// Box-Muller transform over two uniform draws.
fn standard_normal<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    // gen() is in [0, 1); flip it so the logarithm never sees zero.
    let u1: f64 = 1.0 - rng.r#gen::<f64>();
    let u2: f64 = rng.r#gen::<f64>();
    (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos()
}

fn data_source_name(path: &str) -> String {
    std::path::Path::new(path)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(path)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::risk::{RiskItem, RiskLevel};
    use crate::test_support::{build_activity, build_project, on_date};

    fn inputs(actual_cost: f64, burn: f64, volatility: f64) -> ForecastInputs {
        ForecastInputs {
            as_of: on_date(2026, 6, 1),
            actual_cost,
            base_monthly_burn: burn,
            risk_volatility: volatility,
        }
    }

    fn no_shock_model() -> ForecastModel {
        ForecastModel {
            fx_shock_probability: 0.0,
            contingency_probability: 0.0,
            ..ForecastModel::default()
        }
    }

    #[test]
    fn non_finite_samples_sort_totally() {
        let mut samples = vec![3.0, f64::NAN, f64::INFINITY, -1.0, f64::NEG_INFINITY, 2.0];

        sort_samples(&mut samples);

        assert_eq!(&samples[..5], &[f64::NEG_INFINITY, -1.0, 2.0, 3.0, f64::INFINITY]);
        assert!(samples[5].is_nan());
    }

    #[test]
    fn overflowing_burn_keeps_percentiles_ordered() {
        let params = ForecastParams::default();
        let mut rng = StdRng::seed_from_u64(5);

        let output = run_monte_carlo_with_rng(
            &inputs(0.0, 1e308, 2.0),
            &params,
            &ForecastModel::default(),
            &mut rng,
        )
        .unwrap();
        let report = &output.report;

        assert!(output.samples.windows(2).all(|pair| pair[0].total_cmp(&pair[1]).is_le()));
        assert!(report.percentiles.p10.total_cmp(&report.percentiles.p50).is_le());
        assert!(report.percentiles.p50.total_cmp(&report.percentiles.p90).is_le());
    }

    #[test]
    fn deterministic_run_without_volatility_or_shocks() {
        let params = ForecastParams {
            inflation_annual_percent: 12.0,
            ..ForecastParams::default()
        };
        let mut rng = StdRng::seed_from_u64(7);

        let output = run_monte_carlo_with_rng(
            &inputs(1000.0, 100.0, 0.0),
            &params,
            &no_shock_model(),
            &mut rng,
        )
        .unwrap();

        // 12 months of 100 * (1 + 0.01 * m) on top of 1000 already spent.
        let expected = 1000.0 + 100.0 * (12.0 + 0.01 * 78.0);
        assert_eq!(output.samples.len(), ITERATIONS);
        assert!((output.report.percentiles.p10 - expected).abs() < 1e-6);
        assert!((output.report.percentiles.p90 - expected).abs() < 1e-6);
        assert!((output.report.mean - expected).abs() < 1e-6);
    }

    #[test]
    fn compound_inflation_costs_more_than_linear() {
        let params = ForecastParams {
            inflation_annual_percent: 20.0,
            ..ForecastParams::default()
        };
        let linear = no_shock_model();
        let compound = ForecastModel {
            inflation_scaling: InflationScaling::Compound,
            ..no_shock_model()
        };
        let mut rng = StdRng::seed_from_u64(1);

        let linear_run =
            run_monte_carlo_with_rng(&inputs(0.0, 100.0, 0.0), &params, &linear, &mut rng)
                .unwrap();
        let compound_run =
            run_monte_carlo_with_rng(&inputs(0.0, 100.0, 0.0), &params, &compound, &mut rng)
                .unwrap();

        assert!(compound_run.report.percentiles.p50 > linear_run.report.percentiles.p50);
    }

    #[test]
    fn always_firing_shocks_scale_every_month() {
        let params = ForecastParams {
            inflation_annual_percent: 0.0,
            import_exposure_percent: 100.0,
            fx_forward_rate: 4400.0,
            contingency_percent: 10.0,
        };
        let model = ForecastModel {
            fx_shock_probability: 1.0,
            contingency_probability: 1.0,
            ..ForecastModel::default()
        };
        let mut rng = StdRng::seed_from_u64(3);

        let output =
            run_monte_carlo_with_rng(&inputs(0.0, 100.0, 0.0), &params, &model, &mut rng).unwrap();

        let expected = 12.0 * 100.0 * 1.1 * 1.1;
        assert!((output.report.fx_impact - 0.1).abs() < 1e-12);
        assert!((output.report.percentiles.p50 - expected).abs() < 1e-6);
    }

    #[test]
    fn percentiles_are_ordered_across_parameter_ranges() {
        let mut rng = StdRng::seed_from_u64(2024);
        for inflation in [0.0, 20.0] {
            for exposure in [0.0, 100.0] {
                for contingency in [0.0, 30.0] {
                    let params = ForecastParams {
                        inflation_annual_percent: inflation,
                        import_exposure_percent: exposure,
                        fx_forward_rate: 4150.0,
                        contingency_percent: contingency,
                    };
                    let output = run_monte_carlo_with_rng(
                        &inputs(5_000_000.0, 400_000.0, 0.21),
                        &params,
                        &ForecastModel::default(),
                        &mut rng,
                    )
                    .unwrap();
                    let p = output.report.percentiles;
                    assert!(p.p10 <= p.p50 && p.p50 <= p.p90, "unordered percentiles {p:?}");
                    let total: usize = output.report.histogram.iter().map(|bin| bin.count).sum();
                    assert_eq!(total, ITERATIONS);
                    assert_eq!(output.report.histogram.len(), HISTOGRAM_BINS);
                }
            }
        }
    }

    #[test]
    fn higher_inflation_does_not_lower_the_median() {
        let mut rng = StdRng::seed_from_u64(99);
        let runs = 5;
        let mut average_p50 = |inflation: f64| {
            let params = ForecastParams {
                inflation_annual_percent: inflation,
                ..ForecastParams::default()
            };
            (0..runs)
                .map(|_| {
                    run_monte_carlo_with_rng(
                        &inputs(1_000_000.0, 100_000.0, 0.15),
                        &params,
                        &ForecastModel::default(),
                        &mut rng,
                    )
                    .unwrap()
                    .report
                    .percentiles
                    .p50
                })
                .sum::<f64>()
                / runs as f64
        };

        let low = average_p50(0.0);
        let mid = average_p50(10.0);
        let high = average_p50(20.0);
        assert!(low <= mid && mid <= high, "{low} {mid} {high}");
    }

    #[test]
    fn out_of_range_parameters_are_rejected() {
        let mut rng = StdRng::seed_from_u64(0);
        let run = |params: ForecastParams, rng: &mut StdRng| {
            run_monte_carlo_with_rng(
                &inputs(0.0, 1.0, 0.05),
                &params,
                &ForecastModel::default(),
                rng,
            )
        };

        let inflation = ForecastParams {
            inflation_annual_percent: 25.0,
            ..ForecastParams::default()
        };
        assert!(matches!(run(inflation, &mut rng), Err(ForecastError::InvalidInflation(_))));

        let exposure = ForecastParams {
            import_exposure_percent: -1.0,
            ..ForecastParams::default()
        };
        assert!(matches!(run(exposure, &mut rng), Err(ForecastError::InvalidImportExposure(_))));

        let contingency = ForecastParams {
            contingency_percent: 31.0,
            ..ForecastParams::default()
        };
        assert!(matches!(run(contingency, &mut rng), Err(ForecastError::InvalidContingency(_))));

        let fx = ForecastParams {
            fx_forward_rate: 0.0,
            ..ForecastParams::default()
        };
        assert!(matches!(run(fx, &mut rng), Err(ForecastError::InvalidFxForwardRate(_))));
    }

    #[test]
    fn invalid_model_probability_is_rejected() {
        let model = ForecastModel {
            fx_shock_probability: 1.5,
            ..ForecastModel::default()
        };
        let mut rng = StdRng::seed_from_u64(0);
        let result = run_monte_carlo_with_rng(
            &inputs(0.0, 1.0, 0.05),
            &ForecastParams::default(),
            &model,
            &mut rng,
        );
        assert!(matches!(result, Err(ForecastError::InvalidModel(_))));
    }

    #[test]
    fn inputs_fall_back_to_a_twelfth_of_the_budget() {
        let project = build_project(vec![], 1_200_000.0, 0.0);
        let metrics = compute_metrics(&[], &project.budget, None, on_date(2026, 6, 1));

        let inputs = ForecastInputs::from_metrics(
            &metrics,
            &project.budget,
            &RiskStats::default(),
            on_date(2026, 6, 1),
        );

        assert_eq!(inputs.actual_cost, 0.0);
        assert_eq!(inputs.base_monthly_burn, 100_000.0);
        assert!((inputs.risk_volatility - 0.05).abs() < 1e-12);
    }

    #[test]
    fn project_forecast_starts_from_actual_cost() {
        let mut project = build_project(
            vec![build_activity("Structure", 1_000_000.0, 30.0)],
            1_000_000.0,
            300_000.0,
        );
        project.risks = vec![RiskItem {
            description: "Flooding".into(),
            probability: RiskLevel::High,
            impact: RiskLevel::High,
        }];
        let mut rng = StdRng::seed_from_u64(11);

        let output = forecast_project_with_rng(
            &project,
            &ForecastParams::default(),
            &ForecastModel::default(),
            on_date(2026, 3, 2),
            &mut rng,
        )
        .unwrap();

        assert_eq!(output.report.actual_cost, 300_000.0);
        assert!((output.report.base_monthly_burn - 150_000.0).abs() < 1e-6);
        assert!((output.report.risk_volatility - 0.13).abs() < 1e-12);
        assert!(output.report.percentiles.p50 > 300_000.0);
        assert_eq!(output.report.as_of, "2026-03-02");
    }
}
