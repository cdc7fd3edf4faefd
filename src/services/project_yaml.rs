use std::io;

use chrono::NaiveDate;
use serde::Deserialize;
use thiserror::Error;

use crate::domain::activity::{Activity, ActivityStatus, FinancialType};
use crate::domain::bottleneck::{Bottleneck, ImpactLevel};
use crate::domain::budget::{BudgetContext, BudgetLine};
use crate::domain::project::Project;
use crate::domain::resources::{ResourceInventory, ResourceItem};
use crate::domain::risk::{RiskItem, RiskLevel};

#[derive(Error, Debug)]
pub enum ProjectYamlError {
    #[error("failed to read project yaml: {0}")]
    Read(#[from] io::Error),
    #[error("failed to parse project yaml: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("invalid date format: {0}")]
    InvalidDate(String),
    #[error("invalid financial type: {0}")]
    InvalidFinancialType(String),
    #[error("invalid risk level: {0}")]
    InvalidRiskLevel(String),
    #[error("invalid impact level: {0}")]
    InvalidImpactLevel(String),
}

#[derive(Deserialize)]
struct ProjectRecord {
    name: String,
    contractor: Option<String>,
    #[serde(default)]
    total_budget: f64,
    #[serde(default)]
    spent_budget: f64,
    start_date: String,
    #[serde(default)]
    budget_breakdown: Vec<BudgetLineRecord>,
    #[serde(default)]
    activities: Vec<ActivityRecord>,
    #[serde(default)]
    resources: ResourcesRecord,
    #[serde(default)]
    risks: Vec<RiskRecord>,
    #[serde(default)]
    bottlenecks: Vec<BottleneckRecord>,
}

#[derive(Deserialize)]
struct BudgetLineRecord {
    category: String,
    amount: f64,
}

#[derive(Deserialize)]
struct ActivityRecord {
    code: Option<String>,
    description: String,
    #[serde(default)]
    estimated_cost: f64,
    #[serde(default)]
    progress: f64,
    start_date: Option<String>,
    end_date: Option<String>,
    status: Option<String>,
    financial_type: Option<String>,
    #[serde(default)]
    critical_path: bool,
    #[serde(default)]
    spf: bool,
    delay_days: Option<i64>,
}

#[derive(Deserialize, Default)]
struct ResourcesRecord {
    #[serde(default)]
    personnel: Vec<ResourceRecord>,
    #[serde(default)]
    machinery: Vec<ResourceRecord>,
    #[serde(default)]
    equipment: Vec<ResourceRecord>,
}

#[derive(Deserialize)]
struct ResourceRecord {
    name: String,
    total_cost: Option<f64>,
}

#[derive(Deserialize)]
struct RiskRecord {
    description: String,
    probability: Option<String>,
    impact: Option<String>,
}

#[derive(Deserialize)]
struct BottleneckRecord {
    process_name: String,
    responsible_entity: Option<String>,
    #[serde(default)]
    days_delayed: i64,
    impact_level: Option<String>,
}

pub fn load_project_from_yaml_file(path: &str) -> Result<Project, ProjectYamlError> {
    let contents = std::fs::read_to_string(path)?;
    deserialize_project_from_yaml_str(&contents)
}

pub fn deserialize_project_from_yaml_str(input: &str) -> Result<Project, ProjectYamlError> {
    let record: ProjectRecord = serde_yaml::from_str(input)?;

    let mut budget = BudgetContext::new(
        record.total_budget,
        record.spent_budget,
        parse_date(&record.start_date)?,
    );
    budget.budget_breakdown = record
        .budget_breakdown
        .into_iter()
        .map(|line| BudgetLine {
            category: line.category,
            amount: line.amount,
        })
        .collect();

    let activities = record
        .activities
        .into_iter()
        .map(activity_from_record)
        .collect::<Result<Vec<_>, _>>()?;
    let risks = record
        .risks
        .into_iter()
        .map(risk_from_record)
        .collect::<Result<Vec<_>, _>>()?;
    let bottlenecks = record
        .bottlenecks
        .into_iter()
        .map(bottleneck_from_record)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Project {
        name: record.name,
        contractor: record.contractor,
        budget,
        activities,
        resources: ResourceInventory {
            personnel: resources_from_records(record.resources.personnel),
            machinery: resources_from_records(record.resources.machinery),
            equipment: resources_from_records(record.resources.equipment),
        },
        risks,
        bottlenecks,
    })
}

fn activity_from_record(record: ActivityRecord) -> Result<Activity, ProjectYamlError> {
    Ok(Activity {
        code: record.code,
        description: record.description,
        estimated_cost: record.estimated_cost,
        progress: record.progress,
        start_date: parse_date_opt(record.start_date.as_deref())?,
        end_date: parse_date_opt(record.end_date.as_deref())?,
        status: parse_status(record.status.as_deref()),
        financial_type: parse_financial_type(record.financial_type.as_deref())?,
        is_critical_path: record.critical_path,
        is_spf: record.spf,
        delay_days: record.delay_days,
    })
}

fn risk_from_record(record: RiskRecord) -> Result<RiskItem, ProjectYamlError> {
    Ok(RiskItem {
        description: record.description,
        probability: parse_risk_level(record.probability.as_deref())?,
        impact: parse_risk_level(record.impact.as_deref())?,
    })
}

fn bottleneck_from_record(record: BottleneckRecord) -> Result<Bottleneck, ProjectYamlError> {
    let impact_level = match record.impact_level.as_deref().map(str::trim) {
        None => ImpactLevel::Moderate,
        Some(value) if value.eq_ignore_ascii_case("critical") => ImpactLevel::Critical,
        Some(value) if value.eq_ignore_ascii_case("moderate") => ImpactLevel::Moderate,
        Some(value) => return Err(ProjectYamlError::InvalidImpactLevel(value.to_string())),
    };
    Ok(Bottleneck {
        process_name: record.process_name,
        responsible_entity: record.responsible_entity,
        days_delayed: record.days_delayed,
        impact_level,
        related_to_spf: false,
    })
}

fn resources_from_records(records: Vec<ResourceRecord>) -> Vec<ResourceItem> {
    records
        .into_iter()
        .map(|record| ResourceItem {
            name: record.name,
            total_cost: record.total_cost,
        })
        .collect()
}

fn parse_date(value: &str) -> Result<NaiveDate, ProjectYamlError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| ProjectYamlError::InvalidDate(value.to_string()))
}

fn parse_date_opt(value: Option<&str>) -> Result<Option<NaiveDate>, ProjectYamlError> {
    value.map(parse_date).transpose()
}

fn parse_status(value: Option<&str>) -> ActivityStatus {
    match value.map(str::trim) {
        Some(value) if value.eq_ignore_ascii_case("delayed") => ActivityStatus::Delayed,
        Some(value) if value.eq_ignore_ascii_case("completed") => ActivityStatus::Completed,
        Some(value) => ActivityStatus::Other(value.to_string()),
        None => ActivityStatus::default(),
    }
}

fn parse_financial_type(value: Option<&str>) -> Result<Option<FinancialType>, ProjectYamlError> {
    match value.map(str::trim) {
        None => Ok(None),
        Some(value) if value.eq_ignore_ascii_case("capex") => Ok(Some(FinancialType::Capex)),
        Some(value) if value.eq_ignore_ascii_case("opex") => Ok(Some(FinancialType::Opex)),
        Some(value) => Err(ProjectYamlError::InvalidFinancialType(value.to_string())),
    }
}

fn parse_risk_level(value: Option<&str>) -> Result<RiskLevel, ProjectYamlError> {
    match value.map(str::trim) {
        None => Ok(RiskLevel::Low),
        Some(value) if value.eq_ignore_ascii_case("low") => Ok(RiskLevel::Low),
        Some(value) if value.eq_ignore_ascii_case("medium") => Ok(RiskLevel::Medium),
        Some(value) if value.eq_ignore_ascii_case("high") => Ok(RiskLevel::High),
        Some(value) => Err(ProjectYamlError::InvalidRiskLevel(value.to_string())),
    }
}
