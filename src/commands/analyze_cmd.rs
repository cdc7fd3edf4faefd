use serde::Serialize;
use tracing::warn;

use crate::commands::base_commands::{Commands, parse_as_of};
use evm_forecasts::services::analysis_service::{
    AnalysisContext, AnalysisResponse, AnalysisServiceConfig, AnalysisServiceError, ApiKey,
    HttpAnalysisService, build_analysis_context, enrich,
};
use evm_forecasts::services::project_yaml::load_project_from_yaml_file;

#[derive(Serialize)]
struct AnalysisOutput<'a> {
    context: &'a AnalysisContext,
    analysis: Option<AnalysisResponse>,
}

pub fn analyze_command(cmd: Commands) {
    if let Commands::Analyze {
        input,
        config,
        output,
        as_of,
    } = cmd
    {
        let Some(today) = parse_as_of(&as_of) else {
            eprintln!("Failed to parse evaluation date: {as_of}");
            return;
        };
        let project = match load_project_from_yaml_file(&input) {
            Ok(project) => project,
            Err(e) => {
                eprintln!("Failed to load project: {e:?}");
                return;
            }
        };

        let context = build_analysis_context(&project, today);
        let analysis = match create_service(&config) {
            Ok(service) => enrich(&service, &context),
            Err(e) => {
                warn!(error = %e, "analysis service not configured, continuing with local metrics");
                None
            }
        };
        let has_analysis = analysis.is_some();

        let yaml = match serde_yaml::to_string(&AnalysisOutput {
            context: &context,
            analysis,
        }) {
            Ok(contents) => contents,
            Err(e) => {
                eprintln!("Failed to serialize analysis output: {e:?}");
                return;
            }
        };

        if let Err(e) = std::fs::write(&output, yaml) {
            eprintln!("Failed to write analysis output: {e:?}");
        } else {
            if !has_analysis {
                println!("Analysis service unavailable, wrote local metrics only");
            }
            println!("Analysis written to {output}");
        }
    }
}

fn create_service(config_path: &str) -> Result<HttpAnalysisService, AnalysisServiceError> {
    let config = AnalysisServiceConfig::from_yaml_file(config_path)?;
    let api_key = ApiKey::from_env()?;
    HttpAnalysisService::new(config, api_key)
}
