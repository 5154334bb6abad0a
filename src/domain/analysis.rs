//! Types for the independent per-biomarker rule analysis path.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::Sex;

/// Severity classification of an analysis finding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    #[default]
    Normal,
    Borderline,
    High,
    Low,
    Critical,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Normal => "Normal",
            Self::Borderline => "Borderline",
            Self::High => "High",
            Self::Low => "Low",
            Self::Critical => "Critical",
        };
        write!(f, "{label}")
    }
}

/// One standardized biomarker measurement, as produced by the external
/// report parsers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BiomarkerReading {
    pub biomarker: String,
    pub value: f64,
    pub unit: String,
    #[serde(rename = "referenceRange")]
    pub reference_range: String,
}

/// Demographic context for the rule analysis path. Both fields are optional;
/// absent fields simply contribute no facts.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(rename = "dateOfBirth")]
    pub date_of_birth: Option<NaiveDate>,
    pub sex: Option<Sex>,
}

/// One finding produced by a fired biomarker rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRecord {
    /// Rule event type, e.g. "HighTotalCholesterol".
    #[serde(rename = "type")]
    pub kind: String,
    pub interpretation: String,
    pub recommendation: String,
    #[serde(default)]
    pub severity: Severity,
}
