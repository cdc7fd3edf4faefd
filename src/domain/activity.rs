use chrono::NaiveDate;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityStatus {
    Delayed,
    Completed,
    Other(String),
}

impl Default for ActivityStatus {
    fn default() -> Self {
        ActivityStatus::Other(String::new())
    }
}

/// Spend category of an activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FinancialType {
    #[serde(rename = "CAPEX")]
    Capex,
    #[serde(rename = "OPEX")]
    Opex,
}

/// A schedule activity (milestone) carrying cost and progress.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Activity {
    pub code: Option<String>,
    pub description: String,
    pub estimated_cost: f64,
    /// Percent complete. Not validated on input, see [`Activity::progress_fraction`].
    pub progress: f64,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub status: ActivityStatus,
    pub financial_type: Option<FinancialType>,
    pub is_critical_path: bool,
    pub is_spf: bool,
    pub delay_days: Option<i64>,
}

impl Activity {
    pub fn new(description: &str, estimated_cost: f64, progress: f64) -> Self {
        Self {
            description: description.to_string(),
            estimated_cost,
            progress,
            ..Self::default()
        }
    }

    /// Progress clamped to `[0, 100]` and expressed as a fraction.
    pub fn progress_fraction(&self) -> f64 {
        if !self.progress.is_finite() {
            return 0.0;
        }
        self.progress.clamp(0.0, 100.0) / 100.0
    }

    /// Negative or non-finite costs count as zero.
    pub fn cost(&self) -> f64 {
        if self.estimated_cost.is_finite() {
            self.estimated_cost.max(0.0)
        } else {
            0.0
        }
    }

    pub fn earned_value(&self) -> f64 {
        self.cost() * self.progress_fraction()
    }

    /// Time-phased planned value on `date`.
    ///
    /// Activities without both dates, or whose end precedes their start,
    /// contribute nothing.
    pub fn planned_value_at(&self, date: NaiveDate) -> f64 {
        let (Some(start), Some(end)) = (self.start_date, self.end_date) else {
            return 0.0;
        };
        if end < start {
            return 0.0;
        }
        if date >= end {
            return self.cost();
        }
        if date <= start {
            return 0.0;
        }
        let total_days = end.signed_duration_since(start).num_days() as f64;
        let days_passed = date.signed_duration_since(start).num_days() as f64;
        self.cost() * (days_passed / total_days).clamp(0.0, 1.0)
    }

    /// True from the end date onwards.
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.end_date.is_some_and(|end| end <= today)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::on_date;

    fn phased(start: NaiveDate, end: NaiveDate) -> Activity {
        let mut activity = Activity::new("Earthworks", 100.0, 0.0);
        activity.start_date = Some(start);
        activity.end_date = Some(end);
        activity
    }

    #[test]
    fn progress_is_clamped_to_percentage_range() {
        assert_eq!(Activity::new("a", 10.0, 150.0).progress_fraction(), 1.0);
        assert_eq!(Activity::new("a", 10.0, -5.0).progress_fraction(), 0.0);
        assert_eq!(Activity::new("a", 10.0, 25.0).progress_fraction(), 0.25);
        assert_eq!(Activity::new("a", 10.0, f64::NAN).progress_fraction(), 0.0);
    }

    #[test]
    fn planned_value_is_linear_between_start_and_end() {
        let activity = phased(on_date(2026, 3, 1), on_date(2026, 3, 11));

        assert_eq!(activity.planned_value_at(on_date(2026, 2, 20)), 0.0);
        assert_eq!(activity.planned_value_at(on_date(2026, 3, 1)), 0.0);
        assert_eq!(activity.planned_value_at(on_date(2026, 3, 6)), 50.0);
        assert_eq!(activity.planned_value_at(on_date(2026, 3, 11)), 100.0);
        assert_eq!(activity.planned_value_at(on_date(2026, 4, 1)), 100.0);
    }

    #[test]
    fn planned_value_is_zero_without_dates() {
        let mut activity = Activity::new("Design", 100.0, 0.0);
        activity.start_date = Some(on_date(2026, 1, 1));
        assert_eq!(activity.planned_value_at(on_date(2026, 6, 1)), 0.0);
    }

    #[test]
    fn inverted_date_range_contributes_nothing() {
        let activity = phased(on_date(2026, 3, 11), on_date(2026, 3, 1));
        assert_eq!(activity.planned_value_at(on_date(2026, 3, 5)), 0.0);
        assert_eq!(activity.planned_value_at(on_date(2026, 6, 1)), 0.0);
    }

    #[test]
    fn zero_length_activity_is_fully_planned_on_its_date() {
        let activity = phased(on_date(2026, 3, 1), on_date(2026, 3, 1));
        assert_eq!(activity.planned_value_at(on_date(2026, 2, 28)), 0.0);
        assert_eq!(activity.planned_value_at(on_date(2026, 3, 1)), 100.0);
    }

    #[test]
    fn activity_is_overdue_on_its_end_date() {
        let activity = phased(on_date(2026, 3, 1), on_date(2026, 3, 11));
        assert!(!activity.is_overdue(on_date(2026, 3, 10)));
        assert!(activity.is_overdue(on_date(2026, 3, 11)));
        assert!(activity.is_overdue(on_date(2026, 3, 12)));
        assert!(!Activity::new("Undated", 10.0, 0.0).is_overdue(on_date(2026, 3, 11)));
    }
}
