use std::collections::HashSet;

use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::activity::{Activity, ActivityStatus};
use crate::domain::bottleneck::{Bottleneck, ImpactLevel};
use crate::domain::project::Project;
use crate::domain::risk::RiskStats;

const SPF_DELAY_THRESHOLD_DAYS: i64 = 30;
const SPF_OVERDUE_PROGRESS_THRESHOLD: f64 = 50.0;

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SpfReason {
    /// Flagged as a single point of failure in the project data.
    Flagged,
    /// Critical-path activity that is long delayed or overdue and barely
    /// started.
    CriticalDelay,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct SinglePointOfFailure {
    pub name: String,
    pub source: String,
    pub reason: SpfReason,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ScheduleHealth {
    pub risk_stats: RiskStats,
    pub risk_volatility: f64,
    pub single_points_of_failure: Vec<SinglePointOfFailure>,
    pub bottlenecks: Vec<Bottleneck>,
}

pub fn assess_schedule_health(project: &Project, today: NaiveDate) -> ScheduleHealth {
    let risk_stats = RiskStats::from_risks(&project.risks);
    let spfs = identify_single_points_of_failure(&project.activities, today);
    let bottlenecks = detect_bottlenecks(
        &project.activities,
        &project.bottlenecks,
        &spfs,
        project.contractor.as_deref(),
        today,
    );
    ScheduleHealth {
        risk_volatility: risk_stats.volatility(),
        risk_stats,
        single_points_of_failure: spfs,
        bottlenecks,
    }
}

/// Flagged activities first, then heuristic ones, each in schedule order.
pub fn identify_single_points_of_failure(
    activities: &[Activity],
    today: NaiveDate,
) -> Vec<SinglePointOfFailure> {
    let flagged = activities
        .iter()
        .filter(|activity| activity.is_spf)
        .map(|activity| (activity, SpfReason::Flagged));
    let heuristic = activities
        .iter()
        .filter(|activity| !activity.is_spf && is_critical_delay(activity, today))
        .map(|activity| (activity, SpfReason::CriticalDelay));

    flagged
        .chain(heuristic)
        .map(|(activity, reason)| SinglePointOfFailure {
            name: activity.description.clone(),
            source: "schedule".to_string(),
            reason,
        })
        .collect()
}

fn is_critical_delay(activity: &Activity, today: NaiveDate) -> bool {
    if !activity.is_critical_path {
        return false;
    }
    let long_delay = activity.delay_days.unwrap_or(0) > SPF_DELAY_THRESHOLD_DAYS;
    let stalled = activity.is_overdue(today) && activity.progress < SPF_OVERDUE_PROGRESS_THRESHOLD;
    long_delay || stalled
}

/// Merges declared bottlenecks with ones derived from delayed or overdue
/// activities. Names are unique (first occurrence wins) and critical
/// entries come first.
pub fn detect_bottlenecks(
    activities: &[Activity],
    declared: &[Bottleneck],
    spfs: &[SinglePointOfFailure],
    contractor: Option<&str>,
    today: NaiveDate,
) -> Vec<Bottleneck> {
    let generated = activities
        .iter()
        .filter(|activity| is_blocking(activity, today))
        .map(|activity| {
            let label = if activity.is_critical_path {
                "Critical block"
            } else {
                "Operational delay"
            };
            Bottleneck {
                process_name: format!("{label}: {}", activity.description),
                responsible_entity: Some(contractor.unwrap_or("Contractor").to_string()),
                days_delayed: activity
                    .end_date
                    .map(|end| today.signed_duration_since(end).num_days().max(0))
                    .unwrap_or(0),
                impact_level: if activity.is_critical_path {
                    ImpactLevel::Critical
                } else {
                    ImpactLevel::Moderate
                },
                related_to_spf: spfs.iter().any(|spf| spf.name == activity.description),
            }
        });

    let mut seen = HashSet::new();
    let mut merged: Vec<Bottleneck> = declared
        .iter()
        .cloned()
        .chain(generated)
        .filter(|bottleneck| seen.insert(bottleneck.process_name.clone()))
        .collect();
    merged.sort_by_key(|bottleneck| bottleneck.impact_level != ImpactLevel::Critical);
    merged
}

fn is_blocking(activity: &Activity, today: NaiveDate) -> bool {
    activity.status == ActivityStatus::Delayed
        || (activity.is_overdue(today) && activity.progress < 100.0)
}
