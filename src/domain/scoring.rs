//! Per-disease score weights and diet/lifestyle profiles.

use serde::{Deserialize, Serialize};

/// Severity/rarity/cost weights for one disease, joined by label.
///
/// Factors are typically authored in a 0-10 range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreWeights {
    pub label: String,
    pub rarity: f64,
    pub treatment_complexity: f64,
    pub seriousness: f64,
    pub treatment_cost: f64,
}

impl ScoreWeights {
    /// Fixed weighted composite; seriousness dominates at 60%.
    #[must_use]
    pub fn base_score(&self) -> f64 {
        0.1 * self.rarity
            + 0.2 * self.treatment_complexity
            + 0.6 * self.seriousness
            + 0.2 * self.treatment_cost
    }

    /// Whether every factor is a usable finite number.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.rarity.is_finite()
            && self.treatment_complexity.is_finite()
            && self.seriousness.is_finite()
            && self.treatment_cost.is_finite()
    }
}

/// Diet, lifestyle, and preventive-action recommendations for one disease,
/// joined by label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DietProfile {
    pub label: String,
    #[serde(default)]
    pub diet: Vec<String>,
    #[serde(default)]
    pub lifestyle: Vec<String>,
    #[serde(default)]
    pub preventive: Vec<String>,
}
