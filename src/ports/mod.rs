//! Ports layer: Trait definitions for external operations.
//!
//! Following Hexagonal Architecture, these traits define the boundaries
//! between the engine and external systems (catalog storage, rule evaluation).

mod catalog_source;
mod rule_engine;

pub use catalog_source::CatalogSource;
pub use rule_engine::{
    BiomarkerRule, Condition, ConditionOperator, Conditions, EventParams, FactValue, Facts,
    RuleDefinition, RuleEngine, RuleEvent,
};
