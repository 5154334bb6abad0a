//! Bioscore: Biomarker analysis and disease-scoring engine.
//!
//! CLI entry point: loads the static catalogs from a directory, reads one
//! prediction request from a JSON file, and prints a JSON report.
//!
//! Usage: `bioscore <catalog-dir> <request.json>`
//!
//! Request shape:
//! `{ "age": 45, "sex": "male", "labData": { "Glucose": 147 }, "dateOfBirth": "1981-02-03" }`
//! (`dateOfBirth` is optional and only feeds the rule analysis path.)

use std::sync::Arc;

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use bioscore::adapters::{file_catalog, ForwardChainEngine};
use bioscore::application::{AnalysisService, LabData, PredictionService};
use bioscore::domain::{
    AgeGroup, AnalysisRecord, BiomarkerReading, Catalogs, PredictionResult, RangeStatus, Sex,
    UserProfile,
};
use bioscore::ports::CatalogSource;

#[derive(Debug, Deserialize)]
struct Request {
    age: u32,
    sex: Sex,
    #[serde(rename = "labData")]
    lab_data: LabData,
    #[serde(default, rename = "dateOfBirth")]
    date_of_birth: Option<NaiveDate>,
}

/// One lab value flagged against its resolved reference range.
#[derive(Debug, Serialize)]
struct RangeFlag {
    biomarker: String,
    value: f64,
    unit: String,
    #[serde(rename = "referenceRange")]
    reference_range: String,
    status: RangeStatus,
}

#[derive(Debug, Serialize)]
struct Report {
    prediction: PredictionResult,
    #[serde(rename = "outOfRange")]
    out_of_range: Vec<RangeFlag>,
    analysis: Vec<AnalysisRecord>,
}

fn main() -> Result<()> {
    // Logs go to stderr so the JSON report on stdout stays machine-readable.
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_env("BIOSCORE_LOG").unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args: Vec<String> = std::env::args().collect();
    let [_, catalog_dir, request_path] = args.as_slice() else {
        bail!("usage: bioscore <catalog-dir> <request.json>");
    };

    let source = file_catalog::FileCatalogSource::new(catalog_dir);
    let catalogs = Arc::new(
        source
            .load()
            .with_context(|| format!("loading catalogs from {catalog_dir}"))?,
    );
    let service = PredictionService::with_catalogs(Arc::clone(&catalogs));

    let request_text = std::fs::read_to_string(request_path)
        .with_context(|| format!("reading request {request_path}"))?;
    let request: Request =
        serde_json::from_str(&request_text).context("parsing prediction request")?;

    let prediction = service.predict(request.age, request.sex, &request.lab_data)?;
    let out_of_range = flag_out_of_range(&catalogs, &request);
    let analysis = run_rule_analysis(&source, &catalogs, &request)?;

    tracing::info!(
        ranked = prediction.disease_score.len(),
        flagged = out_of_range.len(),
        findings = analysis.len(),
        "report complete"
    );

    let report = Report {
        prediction,
        out_of_range,
        analysis,
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

/// Flag every lab value that falls outside its resolved reference range.
fn flag_out_of_range(catalogs: &Catalogs, request: &Request) -> Vec<RangeFlag> {
    let age_group = AgeGroup::from_age(request.age);
    request
        .lab_data
        .iter()
        .filter_map(|(biomarker, value)| {
            let range = catalogs.reference.resolve(biomarker, age_group, request.sex)?;
            let status = range.classify(*value);
            (status != RangeStatus::Within).then(|| RangeFlag {
                biomarker: biomarker.clone(),
                value: *value,
                unit: range.unit.clone(),
                reference_range: range.display(),
                status,
            })
        })
        .collect()
}

/// Run the rule analysis path when a rule catalog is present.
fn run_rule_analysis(
    source: &file_catalog::FileCatalogSource,
    catalogs: &Catalogs,
    request: &Request,
) -> Result<Vec<AnalysisRecord>> {
    let rules_path = source.rules_path();
    if !rules_path.exists() {
        tracing::debug!(path = %rules_path.display(), "no rule catalog, skipping analysis");
        return Ok(Vec::new());
    }

    let rules = file_catalog::load_rules(&rules_path)
        .with_context(|| format!("loading rules from {}", rules_path.display()))?;
    let analyzer = AnalysisService::with_rules(ForwardChainEngine::new(), rules)
        .context("registering biomarker rules")?;

    let age_group = AgeGroup::from_age(request.age);
    let readings: Vec<BiomarkerReading> = request
        .lab_data
        .iter()
        .map(|(biomarker, value)| {
            let range = catalogs.reference.resolve(biomarker, age_group, request.sex);
            BiomarkerReading {
                biomarker: biomarker.clone(),
                value: *value,
                unit: range.map(|r| r.unit.clone()).unwrap_or_default(),
                reference_range: range
                    .map(|r| r.display())
                    .unwrap_or_else(|| "Not specified".to_string()),
            }
        })
        .collect();
    let user = UserProfile {
        date_of_birth: request.date_of_birth,
        sex: Some(request.sex),
    };

    Ok(analyzer.analyze(&readings, &user))
}
