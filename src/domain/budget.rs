use chrono::NaiveDate;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetLine {
    pub category: String,
    pub amount: f64,
}

/// Project-level budget figures used as fallbacks by the metrics engine.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetContext {
    pub total_budget: f64,
    pub spent_budget: f64,
    pub start_date: NaiveDate,
    pub budget_breakdown: Vec<BudgetLine>,
}

impl BudgetContext {
    pub fn new(total_budget: f64, spent_budget: f64, start_date: NaiveDate) -> Self {
        Self {
            total_budget,
            spent_budget,
            start_date,
            budget_breakdown: Vec::new(),
        }
    }

    /// Months elapsed since the project start, never less than one.
    pub fn elapsed_months(&self, today: NaiveDate) -> f64 {
        let days = today.signed_duration_since(self.start_date).num_days() as f64;
        (days / 30.0).max(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::on_date;

    #[test]
    fn elapsed_months_is_floored_at_one() {
        let budget = BudgetContext::new(1000.0, 0.0, on_date(2026, 1, 1));
        assert_eq!(budget.elapsed_months(on_date(2026, 1, 10)), 1.0);
        assert_eq!(budget.elapsed_months(on_date(2025, 12, 1)), 1.0);
        assert_eq!(budget.elapsed_months(on_date(2026, 3, 2)), 2.0);
    }
}
