use chrono::NaiveDate;

use crate::domain::activity::Activity;
use crate::domain::budget::BudgetContext;
use crate::domain::project::Project;
use crate::domain::resources::ResourceInventory;

pub fn on_date(year: i32, month: u32, day: u32) -> chrono::NaiveDate {
    chrono::NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

pub fn build_activity(description: &str, cost: f64, progress: f64) -> Activity {
    Activity::new(description, cost, progress)
}

pub fn build_phased_activity(
    description: &str,
    cost: f64,
    progress: f64,
    start: NaiveDate,
    end: NaiveDate,
) -> Activity {
    let mut activity = Activity::new(description, cost, progress);
    activity.start_date = Some(start);
    activity.end_date = Some(end);
    activity
}

pub fn build_project(activities: Vec<Activity>, total_budget: f64, spent_budget: f64) -> Project {
    Project {
        name: "Test project".to_string(),
        contractor: None,
        budget: BudgetContext::new(total_budget, spent_budget, on_date(2026, 1, 1)),
        activities,
        resources: ResourceInventory::default(),
        risks: Vec::new(),
        bottlenecks: Vec::new(),
    }
}
