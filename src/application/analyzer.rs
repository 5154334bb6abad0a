//! Analysis service: Independent per-biomarker severity analysis.
//!
//! Converts standardized biomarker readings and demographic context into a
//! flat fact set and delegates matching to a pluggable rule engine. This
//! path is advisory: on engine failure it degrades to an empty result.

use chrono::{Datelike, NaiveDate, Utc};

use crate::domain::{AnalysisRecord, BiomarkerReading, UserProfile};
use crate::ports::{BiomarkerRule, FactValue, Facts, RuleEngine};

/// Prefix of every biomarker-derived fact name.
const BIOMARKER_FACT_PREFIX: &str = "biomarker_";

/// Service evaluating biomarker rules against a report.
pub struct AnalysisService<E: RuleEngine> {
    engine: E,
}

impl<E: RuleEngine> AnalysisService<E> {
    /// Create a service over an engine with rules already registered.
    #[must_use]
    pub fn new(engine: E) -> Self {
        Self { engine }
    }

    /// Create a service, registering every active rule from the catalog.
    /// Inactive rules are skipped.
    ///
    /// # Errors
    /// Returns the engine's error if a rule cannot be registered.
    pub fn with_rules(mut engine: E, rules: Vec<BiomarkerRule>) -> Result<Self, E::Error> {
        let mut registered = 0usize;
        for rule in rules.into_iter().filter(|r| r.is_active) {
            engine.add_rule(rule.rule_definition)?;
            registered += 1;
        }
        tracing::info!(rules = registered, "biomarker rules registered");
        Ok(Self { engine })
    }

    /// Evaluate all rules against the readings and demographic context.
    ///
    /// Every fired rule becomes one analysis record, severity defaulting to
    /// Normal. An engine failure is logged and yields an empty list rather
    /// than an error.
    #[must_use]
    pub fn analyze(&self, readings: &[BiomarkerReading], user: &UserProfile) -> Vec<AnalysisRecord> {
        let facts = prepare_facts(readings, user, Utc::now().date_naive());
        match self.engine.run(&facts) {
            Ok(events) => events.into_iter().map(AnalysisRecord::from).collect(),
            Err(e) => {
                tracing::warn!(error = %e, "rule engine failed, returning empty analysis");
                Vec::new()
            }
        }
    }
}

/// Build the fact set for a rule run.
///
/// Each reading becomes a `biomarker_*` numeric fact; `userAge` and
/// `userSex` are added when the profile provides them.
pub fn prepare_facts(readings: &[BiomarkerReading], user: &UserProfile, today: NaiveDate) -> Facts {
    let mut facts = Facts::new();

    for reading in readings {
        facts.insert(fact_name(&reading.biomarker), FactValue::Number(reading.value));
    }

    if let Some(dob) = user.date_of_birth {
        facts.insert("userAge".to_string(), FactValue::Number(f64::from(age_at(dob, today))));
    }
    if let Some(sex) = user.sex {
        facts.insert("userSex".to_string(), FactValue::from(sex.fact_value()));
    }

    facts
}

/// Deterministic fact name for a biomarker: lowercased, whitespace runs
/// collapsed to underscores, prefixed.
#[must_use]
pub fn fact_name(biomarker: &str) -> String {
    let normalized = biomarker
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .to_lowercase();
    format!("{BIOMARKER_FACT_PREFIX}{normalized}")
}

/// Whole years between a date of birth and a reference date, using
/// calendar-correct month/day comparison.
#[must_use]
pub fn age_at(date_of_birth: NaiveDate, today: NaiveDate) -> i32 {
    let mut age = today.year() - date_of_birth.year();
    let had_birthday = (today.month(), today.day()) >= (date_of_birth.month(), date_of_birth.day());
    if !had_birthday {
        age -= 1;
    }
    age
}
