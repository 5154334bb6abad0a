//! Disease criteria definitions and the derived results of the scoring pipeline.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::{AgeGroupFilter, SexFilter};

/// Numeric comparison operator of a disease criterion.
///
/// `==` and `=` deserialize identically as exact equality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operator {
    #[serde(rename = ">=")]
    Gte,
    #[serde(rename = "<=")]
    Lte,
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = "==", alias = "=")]
    Eq,
}

impl Operator {
    /// Test a lab value against a criterion threshold.
    #[must_use]
    pub fn test(self, lab_value: f64, threshold: f64) -> bool {
        match self {
            Self::Gte => lab_value >= threshold,
            Self::Lte => lab_value <= threshold,
            Self::Gt => lab_value > threshold,
            Self::Lt => lab_value < threshold,
            Self::Eq => lab_value == threshold,
        }
    }
}

impl std::fmt::Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let symbol = match self {
            Self::Gte => ">=",
            Self::Lte => "<=",
            Self::Gt => ">",
            Self::Lt => "<",
            Self::Eq => "==",
        };
        write!(f, "{symbol}")
    }
}

/// Single (biomarker, operator, threshold) test of a disease definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Criterion {
    #[serde(rename = "param")]
    pub biomarker: String,
    pub operator: Operator,
    #[serde(rename = "value")]
    pub threshold: f64,
}

/// Catalog entry describing one candidate condition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiseaseDefinition {
    #[serde(rename = "diseaseKey")]
    pub disease_key: String,
    pub label: String,
    #[serde(rename = "dietKey")]
    pub diet_key: String,
    pub age_group: AgeGroupFilter,
    #[serde(rename = "gender")]
    pub sex: SexFilter,
    /// May be empty; such a disease never matches (ratio 0).
    pub criteria: Vec<Criterion>,
}

/// Disease that passed the demographic filter with at least one satisfied
/// criterion. Ephemeral, produced per request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult {
    pub disease_key: String,
    pub label: String,
    pub diet_key: String,
    /// Fraction of defined criteria satisfied, in [0, 1].
    pub match_ratio: f64,
}

/// Match combined with its severity-weighted composite score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredDisease {
    pub disease_key: String,
    pub label: String,
    pub diet_key: String,
    pub match_ratio: f64,
    pub score: f64,
}

/// Deduplicated diet/lifestyle/precaution recommendations for the
/// top-ranked diseases. Consumers must not rely on entry order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Insights {
    pub diet: BTreeSet<String>,
    pub lifestyle: BTreeSet<String>,
    pub precaution: BTreeSet<String>,
}

/// Final output of the prediction pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionResult {
    /// Top-ranked candidate conditions, sorted descending by score.
    pub disease_score: Vec<ScoredDisease>,
    pub insights: Insights,
}
