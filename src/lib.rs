//! # Bioscore
//!
//! Biomarker analysis and disease-scoring engine for lab health reports.
//!
//! This crate provides:
//! - A criteria-matching and severity-weighted scoring pipeline producing
//!   a ranked list of candidate conditions with diet/lifestyle insights
//! - An independent rule-based severity analysis of individual biomarkers
//! - Reference range resolution over demographic buckets
//!
//! ## Architecture
//!
//! The crate follows Hexagonal Architecture:
//! - `domain`: Core business types (catalogs, ranges, diseases, findings)
//! - `ports`: Trait definitions for external operations
//! - `adapters`: Concrete implementations (file catalogs, rule evaluator)
//! - `application`: Use cases orchestrating domain and ports
//!
//! Catalogs are loaded once at startup and shared read-only; every pipeline
//! stage is a pure function of its inputs, safe for unlimited parallel use.

pub mod adapters;
pub mod application;
pub mod domain;
pub mod ports;

pub use application::{AnalysisService, PredictionService};
pub use domain::{Catalogs, PredictionResult, Sex};

/// Result type for bioscore operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for bioscore
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Catalogs not initialized: {0}")]
    NotInitialized(String),

    #[error("Catalog load failed: {0}")]
    Catalog(#[from] adapters::CatalogError),
}
