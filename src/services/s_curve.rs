use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::activity::Activity;

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct SCurvePoint {
    pub date: String,
    pub planned_value: f64,
    pub earned_value: f64,
    pub actual_cost: f64,
}

/// Cumulative planned value at every schedule date, with actual cost
/// distributed in proportion to planned value as of today.
pub fn build_s_curve(
    activities: &[Activity],
    planned_value_today: f64,
    spent_budget: f64,
) -> Vec<SCurvePoint> {
    let dates: BTreeSet<NaiveDate> = activities
        .iter()
        .flat_map(|activity| [activity.start_date, activity.end_date])
        .flatten()
        .collect();
    let earned_value: f64 = activities.iter().map(Activity::earned_value).sum();

    dates
        .into_iter()
        .map(|date| {
            let planned_value: f64 = activities
                .iter()
                .map(|activity| activity.planned_value_at(date))
                .sum();
            let actual_cost = if planned_value_today > 0.0 {
                planned_value / planned_value_today * spent_budget
            } else {
                0.0
            };
            SCurvePoint {
                date: date.format("%Y-%m-%d").to_string(),
                planned_value,
                earned_value,
                actual_cost,
            }
        })
        .collect()
}
