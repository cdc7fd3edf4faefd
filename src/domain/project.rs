use crate::domain::activity::Activity;
use crate::domain::bottleneck::Bottleneck;
use crate::domain::budget::BudgetContext;
use crate::domain::resources::ResourceInventory;
use crate::domain::risk::RiskItem;

#[derive(Debug, Clone, PartialEq)]
pub struct Project {
    pub name: String,
    pub contractor: Option<String>,
    pub budget: BudgetContext,
    pub activities: Vec<Activity>,
    pub resources: ResourceInventory,
    pub risks: Vec<RiskItem>,
    pub bottlenecks: Vec<Bottleneck>,
}
