use crate::commands::base_commands::{Commands, parse_as_of};
use evm_forecasts::services::evm::compute_metrics;
use evm_forecasts::services::project_yaml::load_project_from_yaml_file;
use evm_forecasts::services::s_curve::build_s_curve;

pub fn s_curve_command(cmd: Commands) {
    if let Commands::SCurve { input, output, as_of } = cmd {
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
        let curve = build_s_curve(
            &project.activities,
            metrics.planned_value,
            project.budget.spent_budget,
        );

        let yaml = match serde_yaml::to_string(&curve) {
            Ok(contents) => contents,
            Err(e) => {
                eprintln!("Failed to serialize s-curve: {e:?}");
                return;
            }
        };

        if let Err(e) = std::fs::write(&output, yaml) {
            eprintln!("Failed to write s-curve output: {e:?}");
        } else {
            println!("S-curve with {} points written to {output}", curve.len());
        }
    }
}
