//! Adapters layer: Concrete implementations of ports.
//!
//! These modules contain the actual integrations:
//! - `file_catalog`: directory of JSON/tabular catalog files
//! - `forward_chain`: hand-rolled ALL-of rule evaluator

pub mod file_catalog;
pub mod forward_chain;

// Re-export catalog error for lib.rs
pub use file_catalog::CatalogError;
pub use forward_chain::{ForwardChainEngine, RuleEngineError};
