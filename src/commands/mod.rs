pub mod analyze_cmd;
pub mod base_commands;
pub mod forecast_cmd;
pub mod health_cmd;
pub mod metrics_cmd;
pub mod report_format;
pub mod s_curve_cmd;
