//! Domain layer: Core business types and logic.
//!
//! Pure types with no IO: demographics, reference ranges, disease criteria,
//! score weights, diet profiles, and the immutable catalog bundle.

mod analysis;
mod catalogs;
mod demographics;
mod disease;
mod reference;
mod scoring;

pub use analysis::{AnalysisRecord, BiomarkerReading, Severity, UserProfile};
pub use catalogs::Catalogs;
pub use demographics::{AgeGroup, AgeGroupFilter, Sex, SexFilter};
pub use disease::{
    Criterion, DiseaseDefinition, Insights, MatchResult, Operator, PredictionResult, ScoredDisease,
};
pub use reference::{RangeStatus, ReferenceRange, ReferenceTable};
pub use scoring::{DietProfile, ScoreWeights};
