use evm_forecasts::services::evm::MetricsSnapshot;
use evm_forecasts::services::schedule_health::ScheduleHealth;
use evm_forecasts::services::simulation_types::ForecastReport;

pub fn format_metrics_report(project_name: &str, as_of: &str, metrics: &MetricsSnapshot) -> String {
    let mut lines = Vec::new();
    lines.push("Earned Value Report".to_string());
    lines.push(format!("Project: {project_name}"));
    lines.push(format!("As of: {as_of}"));
    lines.push(String::new());
    lines.push("Metric | Value".to_string());
    lines.push("-------|------".to_string());
    lines.push(format_row("Budget (BAC)", metrics.total_planned_budget));
    lines.push(format_row("Planned value (PV)", metrics.planned_value));
    lines.push(format_row("Earned value (EV)", metrics.earned_value));
    lines.push(format_row("Actual cost (AC)", metrics.actual_cost));
    lines.push(format!("CPI | {:.3}", metrics.cpi));
    lines.push(format!("SPI | {:.3}", metrics.spi));
    lines.push(format_row("EAC", metrics.eac));
    lines.push(format_row("Cost variance (CV)", metrics.cost_variance));
    lines.push(format!("Financial progress | {:.1}%", metrics.financial_progress));
    lines.push(format_row("Burn rate (monthly)", metrics.burn_rate));
    lines.push(format_row("CAPEX", metrics.capex));
    lines.push(format_row("OPEX", metrics.opex));

    lines.join("\n")
}

pub fn format_forecast_report(report: &ForecastReport) -> String {
    let mut lines = Vec::new();
    lines.push("Cost Forecast Report".to_string());
    lines.push(format!("Data source: {}", report.data_source));
    lines.push(format!("As of: {}", report.as_of));
    lines.push(format!("Iterations: {}", report.iterations));
    lines.push(format!("Horizon: {} months", report.horizon_months));
    lines.push(format!(
        "Inflation: {:.1}% | Import exposure: {:.0}% | FX forward: {:.0} | Contingency: {:.0}%",
        report.params.inflation_annual_percent,
        report.params.import_exposure_percent,
        report.params.fx_forward_rate,
        report.params.contingency_percent
    ));
    lines.push(String::new());
    lines.push("Percentile | Total cost".to_string());
    lines.push("-----------|-----------".to_string());
    lines.push(format_row("P10", report.percentiles.p10));
    lines.push(format_row("P50", report.percentiles.p50));
    lines.push(format_row("P90", report.percentiles.p90));

    lines.join("\n")
}

pub fn format_health_report(health: &ScheduleHealth) -> String {
    let stats = &health.risk_stats;
    let mut lines = Vec::new();
    lines.push("Schedule Health".to_string());
    lines.push(format!(
        "Risks: {} critical, {} high, {} medium, {} low, {} very low",
        stats.critical, stats.high, stats.medium, stats.low, stats.very_low
    ));
    lines.push(format!("Cost volatility: {:.2}", health.risk_volatility));
    lines.push(format!("Single points of failure: {}", health.single_points_of_failure.len()));
    for spf in &health.single_points_of_failure {
        lines.push(format!("  - {}", spf.name));
    }
    lines.push(format!("Bottlenecks: {}", health.bottlenecks.len()));
    for bottleneck in &health.bottlenecks {
        lines.push(format!("  - {} ({} days)", bottleneck.process_name, bottleneck.days_delayed));
    }

    lines.join("\n")
}

fn format_row(label: &str, value: f64) -> String {
    format!("{label} | {value:.2}")
}
