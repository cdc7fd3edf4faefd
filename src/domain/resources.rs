use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ResourceItem {
    pub name: String,
    pub total_cost: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ResourceInventory {
    pub personnel: Vec<ResourceItem>,
    pub machinery: Vec<ResourceItem>,
    pub equipment: Vec<ResourceItem>,
}

fn sum_costs(items: &[ResourceItem]) -> f64 {
    items.iter().filter_map(|item| item.total_cost).sum()
}

impl ResourceInventory {
    pub fn personnel_cost(&self) -> f64 {
        sum_costs(&self.personnel)
    }

    pub fn machinery_cost(&self) -> f64 {
        sum_costs(&self.machinery)
    }

    pub fn equipment_cost(&self) -> f64 {
        sum_costs(&self.equipment)
    }
}
