use tracing::info;

use crate::commands::base_commands::Commands;
use crate::commands::report_format::format_forecast_report;
use evm_forecasts::services::monte_carlo::forecast_from_project_file;
use evm_forecasts::services::simulation_types::ForecastParams;

pub fn forecast_command(cmd: Commands) {
    if let Commands::Forecast {
        input,
        output,
        as_of,
        inflation,
        import_exposure,
        fx_forward,
        contingency,
        seed,
    } = cmd
    {
        let params = ForecastParams {
            inflation_annual_percent: inflation,
            import_exposure_percent: import_exposure,
            fx_forward_rate: fx_forward,
            contingency_percent: contingency,
        };
        let histogram_path = format!("{output}.png");
        let result = forecast_from_project_file(&input, &params, &as_of, seed, &histogram_path);
        let forecast = match result {
            Ok(result) => result,
            Err(e) => {
                eprintln!("Failed to forecast project cost: {e:?}");
                return;
            }
        };
        info!(
            p50 = forecast.report.percentiles.p50,
            seeded = seed.is_some(),
            "forecast finished"
        );

        let yaml = match serde_yaml::to_string(&forecast.report) {
            Ok(contents) => contents,
            Err(e) => {
                eprintln!("Failed to serialize forecast output: {e:?}");
                return;
            }
        };

        if let Err(e) = std::fs::write(&output, yaml) {
            eprintln!("Failed to write forecast output: {e:?}");
        } else {
            println!("{}", format_forecast_report(&forecast.report));
            println!("Forecast written to {output}");
            println!("Forecast histogram written to {histogram_path}");
        }
    }
}
