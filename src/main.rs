mod commands;

use crate::commands::analyze_cmd::analyze_command;
use crate::commands::base_commands::{CliArgs, Commands};
use crate::commands::forecast_cmd::forecast_command;
use crate::commands::health_cmd::health_command;
use crate::commands::metrics_cmd::metrics_command;
use crate::commands::s_curve_cmd::s_curve_command;
use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let args = CliArgs::parse();
    match args.command {
        cmd @ Commands::Metrics { .. } => metrics_command(cmd),
        cmd @ Commands::Forecast { .. } => forecast_command(cmd),
        cmd @ Commands::SCurve { .. } => s_curve_command(cmd),
        cmd @ Commands::Health { .. } => health_command(cmd),
        cmd @ Commands::Analyze { .. } => analyze_command(cmd),
        Commands::Completions { shell } => {
            let mut command = CliArgs::command();
            let name = command.get_name().to_string();
            clap_complete::generate(shell, &mut command, name, &mut std::io::stdout());
        }
    }
}
