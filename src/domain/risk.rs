use serde::Serialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum RiskLevel {
    #[default]
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RiskItem {
    pub description: String,
    pub probability: RiskLevel,
    pub impact: RiskLevel,
}

/// Risk register counts by heat-map cell severity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RiskStats {
    pub critical: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
    pub very_low: usize,
}

impl RiskStats {
    pub fn from_risks(risks: &[RiskItem]) -> Self {
        let mut stats = RiskStats::default();
        for risk in risks {
            use RiskLevel::*;
            match (risk.impact, risk.probability) {
                (High, High) => stats.critical += 1,
                (High, Medium) | (Medium, High) => stats.high += 1,
                (High, Low) | (Medium, Medium) | (Low, High) => stats.medium += 1,
                (Medium, Low) | (Low, Medium) => stats.low += 1,
                (Low, Low) => stats.very_low += 1,
            }
        }
        stats
    }

    /// Monthly cost volatility implied by the register. The 0.05 floor keeps
    /// the forecast stochastic with an empty register.
    pub fn volatility(&self) -> f64 {
        0.08 * self.critical as f64 + 0.04 * self.high as f64 + 0.02 * self.medium as f64 + 0.05
    }
}
