//! Earned value metrics derived from the schedule and budget.
//!
//! Every function here is total: empty or partially populated inputs fall
//! back to neutral values instead of failing, and no denominator can reach
//! zero.

use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;

use crate::domain::activity::{Activity, FinancialType};
use crate::domain::budget::{BudgetContext, BudgetLine};
use crate::domain::resources::ResourceInventory;

/// Budget categories booked as operating expenditure when splitting by
/// breakdown line.
pub const OPEX_CATEGORY_KEYWORDS: [&str; 5] =
    ["admin", "personal", "interventor", "diseño", "gestión"];

pub const HEURISTIC_CAPEX_SHARE: f64 = 0.8;

/// Which data the CAPEX/OPEX split was derived from.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SplitSource {
    ClassifiedActivities,
    ResourceInventory,
    BudgetBreakdown,
    Heuristic,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct MetricsSnapshot {
    pub total_planned_budget: f64,
    pub earned_value: f64,
    pub planned_value: f64,
    pub actual_cost: f64,
    pub cpi: f64,
    pub spi: f64,
    pub eac: f64,
    /// EV - AC; negative when over budget.
    pub cost_variance: f64,
    pub financial_progress: f64,
    pub capex: f64,
    pub opex: f64,
    pub burn_rate: f64,
    pub split_source: SplitSource,
}

pub fn compute_metrics(
    activities: &[Activity],
    budget: &BudgetContext,
    resources: Option<&ResourceInventory>,
    today: NaiveDate,
) -> MetricsSnapshot {
    let mut activity_budget = 0.0;
    let mut earned_value = 0.0;
    let mut planned_value = 0.0;
    for activity in activities {
        activity_budget += activity.cost();
        earned_value += activity.earned_value();
        planned_value += activity.planned_value_at(today);
    }

    let effective_budget = if activity_budget > 0.0 {
        activity_budget
    } else {
        budget.total_budget
    };
    let actual_cost = if budget.spent_budget > 0.0 {
        budget.spent_budget
    } else {
        earned_value
    };

    let cpi = if actual_cost > 0.0 {
        earned_value / actual_cost
    } else {
        1.0
    };
    let spi = if planned_value > 0.0 {
        earned_value / planned_value
    } else {
        1.0
    };
    let eac = if cpi > 0.0 {
        effective_budget / cpi
    } else {
        effective_budget
    };
    let financial_progress = if effective_budget > 0.0 {
        budget.spent_budget / effective_budget * 100.0
    } else {
        0.0
    };

    let (capex, opex, split_source) =
        split_capex_opex(activities, resources, &budget.budget_breakdown, effective_budget);

    let snapshot = MetricsSnapshot {
        total_planned_budget: effective_budget,
        earned_value,
        planned_value,
        actual_cost,
        cpi,
        spi,
        eac,
        cost_variance: earned_value - actual_cost,
        financial_progress,
        capex,
        opex,
        burn_rate: actual_cost / budget.elapsed_months(today),
        split_source,
    };
    debug!(?snapshot, activities = activities.len(), "computed metrics");
    snapshot
}

/// Splits spend into CAPEX and OPEX using the first source that has data:
/// classified activities, resource inventory, budget breakdown, then a fixed
/// 80/20 share of the effective budget.
pub fn split_capex_opex(
    activities: &[Activity],
    resources: Option<&ResourceInventory>,
    breakdown: &[BudgetLine],
    effective_budget: f64,
) -> (f64, f64, SplitSource) {
    if let Some((capex, opex)) = split_from_classified(activities, effective_budget) {
        return (capex, opex, SplitSource::ClassifiedActivities);
    }
    if let Some(inventory) = resources {
        let capex = inventory.machinery_cost() + inventory.equipment_cost();
        let opex = inventory.personnel_cost();
        if capex != 0.0 || opex != 0.0 {
            return (capex, opex, SplitSource::ResourceInventory);
        }
    }
    let (capex, opex) = split_from_breakdown(breakdown);
    if capex != 0.0 || opex != 0.0 {
        return (capex, opex, SplitSource::BudgetBreakdown);
    }
    (
        effective_budget * HEURISTIC_CAPEX_SHARE,
        effective_budget * (1.0 - HEURISTIC_CAPEX_SHARE),
        SplitSource::Heuristic,
    )
}

/// Classified totals rescaled so they add up to the effective budget,
/// absorbing whatever unclassified activities cost.
fn split_from_classified(activities: &[Activity], effective_budget: f64) -> Option<(f64, f64)> {
    let mut classified = false;
    let mut capex = 0.0;
    let mut opex = 0.0;
    for activity in activities {
        match activity.financial_type {
            Some(FinancialType::Capex) => capex += activity.cost(),
            Some(FinancialType::Opex) => opex += activity.cost(),
            None => continue,
        }
        classified = true;
    }
    if !classified {
        return None;
    }

    let classified_total = capex + opex;
    let factor = if classified_total > 0.0 {
        effective_budget / classified_total
    } else {
        1.0
    };
    Some((capex * factor, opex * factor))
}

fn split_from_breakdown(breakdown: &[BudgetLine]) -> (f64, f64) {
    breakdown.iter().fold((0.0, 0.0), |(capex, opex), line| {
        if is_opex_category(&line.category) {
            (capex, opex + line.amount)
        } else {
            (capex + line.amount, opex)
        }
    })
}

pub fn is_opex_category(category: &str) -> bool {
    let category = category.to_lowercase();
    OPEX_CATEGORY_KEYWORDS
        .iter()
        .any(|keyword| category.contains(keyword))
}
