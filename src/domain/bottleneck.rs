use serde::Serialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum ImpactLevel {
    Critical,
    #[default]
    Moderate,
}

/// A process blocking project execution, either declared in the project file
/// or derived from a late activity.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Bottleneck {
    pub process_name: String,
    pub responsible_entity: Option<String>,
    pub days_delayed: i64,
    pub impact_level: ImpactLevel,
    pub related_to_spf: bool,
}
