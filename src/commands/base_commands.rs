use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use clap_complete::Shell;

#[derive(Parser)]
#[command(author, version, about)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compute earned value metrics for a project
    Metrics {
        /// Project YAML file
        #[arg(short, long)]
        input: String,
        /// Output YAML file
        #[arg(short, long)]
        output: String,
        /// Evaluation date (YYYY-MM-DD)
        #[arg(short, long, default_value_t = default_as_of())]
        as_of: String,
    },
    /// Forecast total cost at completion with a Monte Carlo simulation
    Forecast {
        /// Project YAML file
        #[arg(short, long)]
        input: String,
        /// Output YAML file
        #[arg(short, long)]
        output: String,
        /// Evaluation date (YYYY-MM-DD)
        #[arg(short, long, default_value_t = default_as_of())]
        as_of: String,
        /// Annual inflation in percent (0-20)
        #[arg(long, default_value_t = 6.0)]
        inflation: f64,
        /// Share of spend exposed to the exchange rate in percent (0-100)
        #[arg(long, default_value_t = 20.0)]
        import_exposure: f64,
        /// Forward exchange rate, local currency per USD
        #[arg(long, default_value_t = 4150.0)]
        fx_forward: f64,
        /// Contingency surcharge in percent (0-30)
        #[arg(long, default_value_t = 10.0)]
        contingency: f64,
        /// Seed for a reproducible run
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Write the planned/earned/actual S-curve of a project
    SCurve {
        /// Project YAML file
        #[arg(short, long)]
        input: String,
        /// Output YAML file
        #[arg(short, long)]
        output: String,
        /// Evaluation date (YYYY-MM-DD)
        #[arg(short, long, default_value_t = default_as_of())]
        as_of: String,
    },
    /// Summarise risks, single points of failure and bottlenecks
    Health {
        /// Project YAML file
        #[arg(short, long)]
        input: String,
        /// Output YAML file
        #[arg(short, long)]
        output: String,
        /// Evaluation date (YYYY-MM-DD)
        #[arg(short, long, default_value_t = default_as_of())]
        as_of: String,
    },
    /// Send a project snapshot to the analysis service
    Analyze {
        /// Project YAML file
        #[arg(short, long)]
        input: String,
        /// Path to analysis service config YAML
        #[arg(short, long)]
        config: String,
        /// Output YAML file
        #[arg(short, long)]
        output: String,
        /// Evaluation date (YYYY-MM-DD)
        #[arg(short, long, default_value_t = default_as_of())]
        as_of: String,
    },
    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn default_as_of() -> String {
    Local::now().date_naive().format("%Y-%m-%d").to_string()
}

pub fn parse_as_of(as_of: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(as_of, "%Y-%m-%d").ok()
}
