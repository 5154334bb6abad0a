//! File catalog adapter: Implementation of CatalogSource over a directory of
//! static catalog files.
//!
//! Expected layout:
//! - `diseases.json` — `{ "diseases": [...] }` disease criteria catalog
//! - `scores.json` — array of per-disease score weights
//! - `diets.json` — array of diet/lifestyle profiles
//! - `reference_ranges.csv` — row-based reference range table
//! - `rules.json` (optional) — biomarker rules for the analysis path

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::domain::{
    AgeGroup, Catalogs, DietProfile, DiseaseDefinition, ReferenceRange, ReferenceTable,
    ScoreWeights, SexFilter,
};
use crate::ports::{BiomarkerRule, CatalogSource};

const DISEASES_FILE: &str = "diseases.json";
const SCORES_FILE: &str = "scores.json";
const DIETS_FILE: &str = "diets.json";
const RANGES_FILE: &str = "reference_ranges.csv";

/// File name of the optional biomarker rule catalog.
pub const RULES_FILE: &str = "rules.json";

/// Error type for catalog loading.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON in {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("malformed reference table row {line}: {reason}")]
    MalformedRow { line: usize, reason: String },

    #[error("invalid range for {biomarker}: min {min} exceeds max {max}")]
    InvalidRange {
        biomarker: String,
        min: f64,
        max: f64,
    },

    #[error("score weights for '{label}' contain non-finite factors")]
    NonFiniteWeights { label: String },
}

#[derive(Debug, Deserialize)]
struct DiseaseCatalogFile {
    diseases: Vec<DiseaseDefinition>,
}

/// Catalog source reading from a directory of JSON and tabular files.
pub struct FileCatalogSource {
    dir: PathBuf,
}

impl FileCatalogSource {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Path of the optional rule catalog inside this source's directory.
    #[must_use]
    pub fn rules_path(&self) -> PathBuf {
        self.dir.join(RULES_FILE)
    }

    fn read(&self, file: &str) -> Result<String, CatalogError> {
        let path = self.dir.join(file);
        std::fs::read_to_string(&path).map_err(|source| CatalogError::Read {
            path: path.display().to_string(),
            source,
        })
    }

    fn load_json<T: serde::de::DeserializeOwned>(&self, file: &str) -> Result<T, CatalogError> {
        let text = self.read(file)?;
        serde_json::from_str(&text).map_err(|source| CatalogError::Json {
            path: self.dir.join(file).display().to_string(),
            source,
        })
    }
}

impl CatalogSource for FileCatalogSource {
    type Error = CatalogError;

    fn load(&self) -> Result<Catalogs, CatalogError> {
        let diseases: DiseaseCatalogFile = self.load_json(DISEASES_FILE)?;
        let weights: Vec<ScoreWeights> = self.load_json(SCORES_FILE)?;
        for w in &weights {
            if !w.is_finite() {
                return Err(CatalogError::NonFiniteWeights {
                    label: w.label.clone(),
                });
            }
        }
        let diets: Vec<DietProfile> = self.load_json(DIETS_FILE)?;
        let reference = parse_reference_table(&self.read(RANGES_FILE)?)?;

        tracing::info!(
            diseases = diseases.diseases.len(),
            weights = weights.len(),
            diets = diets.len(),
            biomarkers = reference.len(),
            "catalogs loaded"
        );

        Ok(Catalogs::new(reference, diseases.diseases, weights, diets))
    }
}

/// Parse the row-based reference range table.
///
/// Columns: `param, age_group, gender, min, max, unit`. A blank age group
/// defaults to adult, a blank gender to both, and blank bounds mean the
/// range is unbounded on that side. Plain comma separation only; catalog
/// files are controlled assets without quoted fields.
pub fn parse_reference_table(text: &str) -> Result<ReferenceTable, CatalogError> {
    let mut lines = text.lines().enumerate();
    let (_, header) = lines.next().ok_or_else(|| CatalogError::MalformedRow {
        line: 1,
        reason: "empty table".to_string(),
    })?;

    let columns: Vec<&str> = header.split(',').map(str::trim).collect();
    let index_of = |name: &str| columns.iter().position(|c| *c == name);
    let param_idx = index_of("param").ok_or_else(|| CatalogError::MalformedRow {
        line: 1,
        reason: "missing 'param' column".to_string(),
    })?;
    let age_idx = index_of("age_group");
    let gender_idx = index_of("gender");
    let min_idx = index_of("min");
    let max_idx = index_of("max");
    let unit_idx = index_of("unit");

    let mut table = ReferenceTable::new();
    for (number, line) in lines {
        let line_no = number + 1;
        if line.trim().is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split(',').map(str::trim).collect();
        let field = |idx: Option<usize>| idx.and_then(|i| fields.get(i)).copied().unwrap_or("");

        let biomarker = fields.get(param_idx).copied().unwrap_or("");
        if biomarker.is_empty() {
            return Err(CatalogError::MalformedRow {
                line: line_no,
                reason: "missing biomarker name".to_string(),
            });
        }

        let age_group = match field(age_idx) {
            "" => AgeGroup::Adult,
            value => value
                .parse::<AgeGroup>()
                .map_err(|reason| CatalogError::MalformedRow { line: line_no, reason })?,
        };
        let sex = match field(gender_idx) {
            "" => SexFilter::Both,
            value => value
                .parse::<SexFilter>()
                .map_err(|reason| CatalogError::MalformedRow { line: line_no, reason })?,
        };

        let parse_bound = |raw: &str| -> Result<Option<f64>, CatalogError> {
            if raw.is_empty() {
                return Ok(None);
            }
            raw.parse::<f64>()
                .map(Some)
                .map_err(|_| CatalogError::MalformedRow {
                    line: line_no,
                    reason: format!("unparsable bound '{raw}'"),
                })
        };
        let min = parse_bound(field(min_idx))?;
        let max = parse_bound(field(max_idx))?;
        if let (Some(min), Some(max)) = (min, max) {
            if min > max {
                return Err(CatalogError::InvalidRange {
                    biomarker: biomarker.to_string(),
                    min,
                    max,
                });
            }
        }

        table.insert(
            biomarker,
            age_group,
            sex,
            ReferenceRange {
                min,
                max,
                unit: field(unit_idx).to_string(),
            },
        );
    }

    Ok(table)
}

/// Load the biomarker rule catalog from a JSON file.
///
/// Inactive rules are kept in the returned list; callers filter on
/// `is_active` when registering rules with an engine.
pub fn load_rules(path: &Path) -> Result<Vec<BiomarkerRule>, CatalogError> {
    let text = std::fs::read_to_string(path).map_err(|source| CatalogError::Read {
        path: path.display().to_string(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| CatalogError::Json {
        path: path.display().to_string(),
        source,
    })
}
