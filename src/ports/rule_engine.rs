//! Rule engine port: Trait for the generic forward-chaining fact evaluator.
//!
//! The engine has no disease or criteria knowledge; it only tests named
//! facts against externally configured ALL-of condition trees.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::{AnalysisRecord, Severity};

/// A named input value a rule condition can test against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FactValue {
    Number(f64),
    Text(String),
}

impl FactValue {
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(_) => None,
        }
    }
}

impl From<f64> for FactValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for FactValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

/// The fact set a rule run evaluates against.
pub type Facts = BTreeMap<String, FactValue>;

/// Comparison operator of a rule condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ConditionOperator {
    Equal,
    NotEqual,
    GreaterThan,
    GreaterThanInclusive,
    LessThan,
    LessThanInclusive,
}

/// Single fact test within a rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub fact: String,
    pub operator: ConditionOperator,
    pub value: FactValue,
}

/// Condition tree of a rule. Only ALL-of composition is supported: every
/// condition must hold for the rule to fire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conditions {
    pub all: Vec<Condition>,
}

/// Pre-authored payload attached to a rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventParams {
    pub interpretation: String,
    pub recommendation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
}

/// Event emitted when a rule fires.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleEvent {
    #[serde(rename = "type")]
    pub kind: String,
    pub params: EventParams,
}

impl From<RuleEvent> for AnalysisRecord {
    fn from(event: RuleEvent) -> Self {
        Self {
            kind: event.kind,
            interpretation: event.params.interpretation,
            recommendation: event.params.recommendation,
            severity: event.params.severity.unwrap_or_default(),
        }
    }
}

/// Complete rule: condition tree plus the event to emit when it fires.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleDefinition {
    pub conditions: Conditions,
    pub event: RuleEvent,
}

/// Externally configurable biomarker rule, as stored in the rule catalog.
///
/// The surrounding metadata (name, category, demographics) is descriptive;
/// applicability is expressed inside `rule_definition` via `userAge` and
/// `userSex` facts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BiomarkerRule {
    pub rule_name: String,
    #[serde(default)]
    pub target_biomarkers: Vec<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
    pub rule_definition: RuleDefinition,
}

fn default_active() -> bool {
    true
}

/// Trait for generic fact/rule evaluation.
///
/// Any conforming implementation satisfies the analysis contract; rules and
/// facts stay fully decoupled from the disease-scoring pipeline.
pub trait RuleEngine: Send + Sync {
    /// Error type for engine operations.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Register a rule with the engine.
    ///
    /// # Errors
    /// Returns error if the rule cannot be registered.
    fn add_rule(&mut self, rule: RuleDefinition) -> Result<(), Self::Error>;

    /// Evaluate all registered rules against the given facts.
    ///
    /// Returns the events of every rule that fired, in registration order.
    ///
    /// # Errors
    /// Returns error if evaluation fails (e.g. a type-mismatched comparison).
    fn run(&self, facts: &Facts) -> Result<Vec<RuleEvent>, Self::Error>;
}
