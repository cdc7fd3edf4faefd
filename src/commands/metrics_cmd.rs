use serde::Serialize;
use tracing::info;

use crate::commands::base_commands::{Commands, parse_as_of};
use crate::commands::report_format::format_metrics_report;
use evm_forecasts::services::evm::{MetricsSnapshot, compute_metrics};
use evm_forecasts::services::project_yaml::load_project_from_yaml_file;

#[derive(Serialize)]
struct MetricsOutput<'a> {
    project: &'a str,
    as_of: &'a str,
    metrics: &'a MetricsSnapshot,
}

pub fn metrics_command(cmd: Commands) {
    if let Commands::Metrics { input, output, as_of } = cmd {
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

        let metrics = compute_metrics(
            &project.activities,
            &project.budget,
            Some(&project.resources),
            today,
        );
        info!(project = %project.name, cpi = metrics.cpi, spi = metrics.spi, "metrics computed");

        let yaml = match serde_yaml::to_string(&MetricsOutput {
            project: &project.name,
            as_of: &as_of,
            metrics: &metrics,
        }) {
            Ok(contents) => contents,
            Err(e) => {
                eprintln!("Failed to serialize metrics: {e:?}");
                return;
            }
        };

        if let Err(e) = std::fs::write(&output, yaml) {
            eprintln!("Failed to write metrics output: {e:?}");
        } else {
            println!("{}", format_metrics_report(&project.name, &as_of, &metrics));
            println!("Metrics written to {output}");
        }
    }
}
