//! Client side of the remote analysis service.
//!
//! The service turns a project snapshot into narrative diagnosis and
//! recommendations. Its answers are optional enrichment: callers go through
//! [`enrich`], which degrades every failure to `None`.

use std::env;
use std::fs;
use std::time::Duration;

use chrono::NaiveDate;
use reqwest::StatusCode;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::domain::activity::Activity;
use crate::domain::bottleneck::Bottleneck;
use crate::domain::budget::BudgetContext;
use crate::domain::project::Project;
use crate::domain::risk::RiskStats;
use crate::services::evm::{MetricsSnapshot, compute_metrics};
use crate::services::schedule_health::{SinglePointOfFailure, assess_schedule_health};

pub const API_KEY_ENV: &str = "ANALYSIS_API_KEY";

#[derive(Error, Debug)]
pub enum AnalysisServiceError {
    #[error("invalid service config: {0}")]
    Config(String),
    #[error("unauthorized")]
    Unauthorized,
    #[error("endpoint not found")]
    NotFound,
    #[error("connection error")]
    Connection,
    #[error("unexpected status {0}")]
    Status(u16),
    #[error("parse error")]
    Parse,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AnalysisServiceConfig {
    pub base_url: String,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    60
}

impl AnalysisServiceConfig {
    pub fn from_yaml_file(filepath: &str) -> Result<Self, AnalysisServiceError> {
        let contents = fs::read_to_string(filepath)
            .map_err(|err| AnalysisServiceError::Config(format!("failed to read config: {err}")))?;
        serde_yaml::from_str(&contents)
            .map_err(|err| AnalysisServiceError::Config(format!("failed to parse config: {err}")))
    }
}

#[derive(Debug, Clone)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn from_env() -> Result<Self, AnalysisServiceError> {
        match env::var(API_KEY_ENV) {
            Ok(key) if !key.trim().is_empty() => Ok(Self(key)),
            _ => Err(AnalysisServiceError::Unauthorized),
        }
    }
}

/// Everything the service gets to see about a project.
#[derive(Serialize, Debug, Clone)]
pub struct AnalysisContext {
    pub project_name: String,
    pub contractor: Option<String>,
    pub as_of: NaiveDate,
    pub budget: BudgetContext,
    pub activities: Vec<Activity>,
    pub metrics: MetricsSnapshot,
    pub risk_stats: RiskStats,
    pub single_points_of_failure: Vec<SinglePointOfFailure>,
    pub bottlenecks: Vec<Bottleneck>,
}

pub fn build_analysis_context(project: &Project, as_of: NaiveDate) -> AnalysisContext {
    let metrics = compute_metrics(
        &project.activities,
        &project.budget,
        Some(&project.resources),
        as_of,
    );
    let health = assess_schedule_health(project, as_of);
    AnalysisContext {
        project_name: project.name.clone(),
        contractor: project.contractor.clone(),
        as_of,
        budget: project.budget.clone(),
        activities: project.activities.clone(),
        metrics,
        risk_stats: health.risk_stats,
        single_points_of_failure: health.single_points_of_failure,
        bottlenecks: health.bottlenecks,
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct AnalysisResponse {
    #[serde(default)]
    pub diagnosis: Option<String>,
    #[serde(default)]
    pub recommendations: Vec<String>,
    #[serde(default)]
    pub score: Option<f64>,
}

pub trait AnalysisService {
    fn analyze(&self, context: &AnalysisContext) -> Result<AnalysisResponse, AnalysisServiceError>;
}

/// Asks `service` for an analysis, logging and swallowing any failure.
pub fn enrich(
    service: &dyn AnalysisService,
    context: &AnalysisContext,
) -> Option<AnalysisResponse> {
    match service.analyze(context) {
        Ok(response) => {
            info!(project = %context.project_name, "analysis received");
            Some(response)
        }
        Err(e) => {
            warn!(
                error = %e,
                project = %context.project_name,
                "analysis unavailable, continuing with local metrics"
            );
            None
        }
    }
}

#[derive(Serialize)]
struct AnalysisRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    model: Option<&'a str>,
    context: &'a AnalysisContext,
}

pub struct HttpAnalysisService {
    config: AnalysisServiceConfig,
    api_key: ApiKey,
    client: Client,
}

impl HttpAnalysisService {
    pub fn new(
        config: AnalysisServiceConfig,
        api_key: ApiKey,
    ) -> Result<Self, AnalysisServiceError> {
        if config.base_url.trim().is_empty() {
            return Err(AnalysisServiceError::Config(
                "analysis service config is missing base_url".to_string(),
            ));
        }
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|err| AnalysisServiceError::Config(err.to_string()))?;

        Ok(Self {
            config,
            api_key,
            client,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/analyze", self.config.base_url.trim_end_matches('/'))
    }
}

impl AnalysisService for HttpAnalysisService {
    fn analyze(&self, context: &AnalysisContext) -> Result<AnalysisResponse, AnalysisServiceError> {
        let request = AnalysisRequest {
            model: self.config.model.as_deref(),
            context,
        };
        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.api_key.0)
            .json(&request)
            .send()
            .map_err(|_| AnalysisServiceError::Connection)?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(AnalysisServiceError::Unauthorized);
        }
        if status == StatusCode::NOT_FOUND {
            return Err(AnalysisServiceError::NotFound);
        }
        if !status.is_success() {
            return Err(AnalysisServiceError::Status(status.as_u16()));
        }

        response
            .json::<AnalysisResponse>()
            .map_err(|_| AnalysisServiceError::Parse)
    }
}
