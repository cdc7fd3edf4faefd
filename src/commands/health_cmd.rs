use crate::commands::base_commands::{Commands, parse_as_of};
use crate::commands::report_format::format_health_report;
use evm_forecasts::services::project_yaml::load_project_from_yaml_file;
use evm_forecasts::services::schedule_health::assess_schedule_health;

pub fn health_command(cmd: Commands) {
    if let Commands::Health { input, output, as_of } = cmd {
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

        let health = assess_schedule_health(&project, today);
        let yaml = match serde_yaml::to_string(&health) {
            Ok(contents) => contents,
            Err(e) => {
                eprintln!("Failed to serialize schedule health: {e:?}");
                return;
            }
        };

        if let Err(e) = std::fs::write(&output, yaml) {
            eprintln!("Failed to write schedule health output: {e:?}");
        } else {
            println!("{}", format_health_report(&health));
            println!("Schedule health written to {output}");
        }
    }
}
