//! Application layer: Use cases and services.
//!
//! This module orchestrates domain logic with ports to implement
//! the core use cases of the engine.

mod analyzer;
mod predictor;

pub use analyzer::{age_at, fact_name, prepare_facts, AnalysisService};
pub use predictor::{
    aggregate_insights, match_diseases, rank_top, score_diseases, LabData, PredictionService,
    TOP_DISEASES,
};
