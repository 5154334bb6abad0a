//! Prediction service: Orchestrates the disease-scoring pipeline.
//!
//! Pipeline: criteria matching -> severity-weighted scoring -> ranking and
//! truncation -> insight aggregation. Every stage is a pure function over
//! the read-only catalogs.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::adapters::CatalogError;
use crate::domain::{
    AgeGroup, Catalogs, DietProfile, DiseaseDefinition, Insights, MatchResult, PredictionResult,
    ScoreWeights, ScoredDisease, Sex,
};
use crate::ports::CatalogSource;
use crate::Error;

/// Number of ranked diseases retained in a prediction.
pub const TOP_DISEASES: usize = 5;

/// Flattened lab data: biomarker name to measured value.
pub type LabData = BTreeMap<String, f64>;

/// Evaluate every disease's criteria against the lab data.
///
/// Diseases failing the demographic filter are excluded entirely, not scored
/// as zero. A criterion whose biomarker is absent from the lab data counts
/// toward the denominator but never the numerator. Only diseases with a
/// positive match ratio are emitted, in catalog order.
#[must_use]
pub fn match_diseases(
    lab_data: &LabData,
    age_group: AgeGroup,
    sex: Sex,
    diseases: &[DiseaseDefinition],
) -> Vec<MatchResult> {
    diseases
        .iter()
        .filter(|disease| disease.age_group.admits(age_group) && disease.sex.admits(sex))
        .filter_map(|disease| {
            let total = disease.criteria.len();
            if total == 0 {
                return None;
            }
            let matched = disease
                .criteria
                .iter()
                .filter(|criterion| {
                    lab_data
                        .get(&criterion.biomarker)
                        .is_some_and(|value| criterion.operator.test(*value, criterion.threshold))
                })
                .count();
            let match_ratio = matched as f64 / total as f64;
            (match_ratio > 0.0).then(|| MatchResult {
                disease_key: disease.disease_key.clone(),
                label: disease.label.clone(),
                diet_key: disease.diet_key.clone(),
                match_ratio,
            })
        })
        .collect()
}

/// Convert match ratios into severity-weighted scores.
///
/// Weights are joined on the first record with a matching label. Matches
/// without weights, with a zero base score, or with a non-finite ratio are
/// dropped silently; this is the documented degradation policy, not an
/// error. Output keeps insertion order, unsorted.
#[must_use]
pub fn score_diseases(matches: &[MatchResult], weights: &[ScoreWeights]) -> Vec<ScoredDisease> {
    matches
        .iter()
        .filter_map(|m| {
            let base = weights
                .iter()
                .find(|w| w.label == m.label)
                .map(ScoreWeights::base_score)?;
            if base == 0.0 || !m.match_ratio.is_finite() {
                return None;
            }
            Some(ScoredDisease {
                disease_key: m.disease_key.clone(),
                label: m.label.clone(),
                diet_key: m.diet_key.clone(),
                match_ratio: m.match_ratio,
                score: base * m.match_ratio * 10.0,
            })
        })
        .collect()
}

/// Sort descending by score (stable: ties keep prior relative order) and
/// keep only the top entries.
#[must_use]
pub fn rank_top(mut scored: Vec<ScoredDisease>) -> Vec<ScoredDisease> {
    scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
    scored.truncate(TOP_DISEASES);
    scored
}

/// Merge diet/lifestyle/preventive recommendations for the top-ranked
/// diseases into deduplicated sets.
///
/// Profiles are joined on the first record with a matching label; a disease
/// without a profile contributes nothing.
#[must_use]
pub fn aggregate_insights(top: &[ScoredDisease], diets: &[DietProfile]) -> Insights {
    let mut insights = Insights::default();
    for disease in top {
        let Some(profile) = diets.iter().find(|d| d.label == disease.label) else {
            continue;
        };
        insights.diet.extend(profile.diet.iter().cloned());
        insights.lifestyle.extend(profile.lifestyle.iter().cloned());
        insights.precaution.extend(profile.preventive.iter().cloned());
    }
    insights
}

fn validate_lab_data(lab_data: &LabData) -> Result<(), Error> {
    for (biomarker, value) in lab_data {
        if !value.is_finite() {
            return Err(Error::Validation(format!(
                "non-numeric lab value for '{biomarker}'"
            )));
        }
    }
    Ok(())
}

/// Service running the full prediction pipeline over the loaded catalogs.
///
/// Catalogs are loaded once via `initialize` (or injected through
/// `with_catalogs`) and shared read-only afterwards; predictions are pure
/// and safe to run concurrently.
#[derive(Default)]
pub struct PredictionService {
    catalogs: Option<Arc<Catalogs>>,
}

impl PredictionService {
    /// Create an uninitialized service. `predict` rejects calls until
    /// catalogs are loaded.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a service over already-loaded catalogs.
    #[must_use]
    pub fn with_catalogs(catalogs: Arc<Catalogs>) -> Self {
        Self {
            catalogs: Some(catalogs),
        }
    }

    /// Load catalogs from the given source.
    ///
    /// # Errors
    /// Returns error if any catalog fails to load.
    pub fn initialize<C>(&mut self, source: &C) -> crate::Result<()>
    where
        C: CatalogSource,
        C::Error: Into<CatalogError>,
    {
        let catalogs = source.load().map_err(|e| Error::Catalog(e.into()))?;
        self.catalogs = Some(Arc::new(catalogs));
        Ok(())
    }

    /// Whether catalogs have been loaded.
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.catalogs.is_some()
    }

    /// The loaded catalog bundle, if any.
    #[must_use]
    pub fn catalogs(&self) -> Option<&Arc<Catalogs>> {
        self.catalogs.as_ref()
    }

    /// Run the full pipeline for one lab dataset.
    ///
    /// Ages under 18 resolve to the child group, everything else to adult.
    /// An empty lab dataset yields an empty, well-formed result.
    ///
    /// # Errors
    /// Returns `Error::NotInitialized` before catalogs are loaded and
    /// `Error::Validation` for non-finite lab values; catalog-lookup misses
    /// degrade silently instead.
    pub fn predict(&self, age: u32, sex: Sex, lab_data: &LabData) -> crate::Result<PredictionResult> {
        let catalogs = self
            .catalogs
            .as_ref()
            .ok_or_else(|| Error::NotInitialized("catalogs not loaded".to_string()))?;
        validate_lab_data(lab_data)?;

        let age_group = AgeGroup::from_age(age);
        let matches = match_diseases(lab_data, age_group, sex, &catalogs.diseases);
        let scored = score_diseases(&matches, &catalogs.weights);
        let top = rank_top(scored);
        let insights = aggregate_insights(&top, &catalogs.diets);

        tracing::debug!(
            age_group = ?age_group,
            candidates = matches.len(),
            ranked = top.len(),
            "prediction complete"
        );

        Ok(PredictionResult {
            disease_score: top,
            insights,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AgeGroupFilter, Criterion, Operator, ReferenceTable, SexFilter};

    fn criterion(biomarker: &str, operator: Operator, threshold: f64) -> Criterion {
        Criterion {
            biomarker: biomarker.to_string(),
            operator,
            threshold,
        }
    }

    fn disease(
        key: &str,
        label: &str,
        age_group: AgeGroupFilter,
        sex: SexFilter,
        criteria: Vec<Criterion>,
    ) -> DiseaseDefinition {
        DiseaseDefinition {
            disease_key: key.to_string(),
            label: label.to_string(),
            diet_key: format!("{key}_diet"),
            age_group,
            sex,
            criteria,
        }
    }

    fn weights(label: &str, seriousness: f64) -> ScoreWeights {
        ScoreWeights {
            label: label.to_string(),
            rarity: 2.0,
            treatment_complexity: 4.0,
            seriousness,
            treatment_cost: 3.0,
        }
    }

    fn lab(entries: &[(&str, f64)]) -> LabData {
        entries
            .iter()
            .map(|(name, value)| ((*name).to_string(), *value))
            .collect()
    }

    fn fixture_catalogs() -> Catalogs {
        let diseases = vec![
            disease(
                "diabetes_t2",
                "Diabetes",
                AgeGroupFilter::Adult,
                SexFilter::Both,
                vec![
                    criterion("Glucose", Operator::Gte, 126.0),
                    criterion("HbA1c", Operator::Gte, 6.5),
                ],
            ),
            disease(
                "anemia_ida",
                "Iron Deficiency Anemia",
                AgeGroupFilter::Both,
                SexFilter::Both,
                vec![criterion("Hemoglobin", Operator::Lt, 12.0)],
            ),
            disease(
                "hypothyroid",
                "Hypothyroidism",
                AgeGroupFilter::Adult,
                SexFilter::Female,
                vec![criterion("TSH", Operator::Gt, 4.5)],
            ),
        ];
        let weights = vec![
            weights("Diabetes", 8.0),
            weights("Iron Deficiency Anemia", 5.0),
            weights("Hypothyroidism", 4.0),
        ];
        let diets = vec![
            DietProfile {
                label: "Diabetes".to_string(),
                diet: vec!["Low glycemic index foods".to_string(), "More fiber".to_string()],
                lifestyle: vec!["Regular exercise".to_string()],
                preventive: vec!["Annual HbA1c check".to_string()],
            },
            DietProfile {
                label: "Iron Deficiency Anemia".to_string(),
                diet: vec!["Iron-rich foods".to_string(), "More fiber".to_string()],
                lifestyle: vec!["Regular exercise".to_string()],
                preventive: vec!["Periodic CBC".to_string()],
            },
        ];
        Catalogs::new(ReferenceTable::new(), diseases, weights, diets)
    }

    fn fixture_service() -> PredictionService {
        PredictionService::with_catalogs(Arc::new(fixture_catalogs()))
    }

    #[test]
    fn test_full_match_scenario() {
        // Scenario A: both diabetes criteria satisfied.
        let service = fixture_service();
        let result = service
            .predict(45, Sex::Male, &lab(&[("Glucose", 147.0), ("HbA1c", 7.5)]))
            .expect("prediction succeeds");

        assert_eq!(result.disease_score.len(), 1);
        let top = &result.disease_score[0];
        assert_eq!(top.label, "Diabetes");
        assert!((top.match_ratio - 1.0).abs() < f64::EPSILON);
        // base = 0.1*2 + 0.2*4 + 0.6*8 + 0.2*3 = 6.4; score = 6.4 * 1.0 * 10
        assert!((top.score - 64.0).abs() < 1e-9);
        assert!(result.insights.diet.contains("Low glycemic index foods"));
    }

    #[test]
    fn test_empty_lab_data_yields_empty_result() {
        // Scenario B: empty lab data for a child resolves cleanly.
        let service = fixture_service();
        let result = service
            .predict(10, Sex::Female, &LabData::new())
            .expect("prediction succeeds");
        assert!(result.disease_score.is_empty());
        assert!(result.insights.diet.is_empty());
        assert!(result.insights.lifestyle.is_empty());
        assert!(result.insights.precaution.is_empty());
    }

    #[test]
    fn test_absent_biomarker_never_matches() {
        // Scenario C: the only criterion references a missing biomarker.
        let diseases = vec![disease(
            "gout",
            "Gout",
            AgeGroupFilter::Both,
            SexFilter::Both,
            vec![criterion("Uric Acid", Operator::Gt, 7.0)],
        )];
        let matches = match_diseases(&lab(&[("Glucose", 90.0)]), AgeGroup::Adult, Sex::Male, &diseases);
        assert!(matches.is_empty());
    }

    #[test]
    fn test_absent_biomarker_still_counts_in_denominator() {
        let diseases = vec![disease(
            "diabetes_t2",
            "Diabetes",
            AgeGroupFilter::Adult,
            SexFilter::Both,
            vec![
                criterion("Glucose", Operator::Gte, 126.0),
                criterion("HbA1c", Operator::Gte, 6.5),
            ],
        )];
        // HbA1c missing entirely: 1 of 2 criteria matched.
        let matches = match_diseases(&lab(&[("Glucose", 147.0)]), AgeGroup::Adult, Sex::Male, &diseases);
        assert_eq!(matches.len(), 1);
        assert!((matches[0].match_ratio - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_demographic_filter_excludes_entirely() {
        let service = fixture_service();
        // Hypothyroidism is female-only; a matching TSH for a male is excluded.
        let result = service
            .predict(40, Sex::Male, &lab(&[("TSH", 9.0)]))
            .expect("prediction succeeds");
        assert!(result.disease_score.iter().all(|d| d.label != "Hypothyroidism"));
    }

    #[test]
    fn test_empty_criteria_yields_no_match() {
        let diseases = vec![disease(
            "placeholder",
            "Placeholder",
            AgeGroupFilter::Both,
            SexFilter::Both,
            Vec::new(),
        )];
        let matches = match_diseases(&lab(&[("Glucose", 147.0)]), AgeGroup::Adult, Sex::Male, &diseases);
        assert!(matches.is_empty());
    }

    #[test]
    fn test_match_ratio_bounds() {
        let service = fixture_service();
        let result = service
            .predict(
                30,
                Sex::Female,
                &lab(&[("Glucose", 200.0), ("HbA1c", 5.0), ("Hemoglobin", 10.0), ("TSH", 6.0)]),
            )
            .expect("prediction succeeds");
        for d in &result.disease_score {
            assert!(d.match_ratio > 0.0 && d.match_ratio <= 1.0);
            assert!(d.score >= 0.0);
        }
    }

    #[test]
    fn test_missing_weights_drop_silently() {
        // Scenario E: a match without a scoring record disappears, no error.
        let matches = vec![MatchResult {
            disease_key: "unknown".to_string(),
            label: "Unknown Disease".to_string(),
            diet_key: "unknown_diet".to_string(),
            match_ratio: 1.0,
        }];
        let scored = score_diseases(&matches, &[weights("Diabetes", 8.0)]);
        assert!(scored.is_empty());
    }

    #[test]
    fn test_zero_base_score_drops() {
        let matches = vec![MatchResult {
            disease_key: "benign".to_string(),
            label: "Benign".to_string(),
            diet_key: "benign_diet".to_string(),
            match_ratio: 1.0,
        }];
        let zero = ScoreWeights {
            label: "Benign".to_string(),
            rarity: 0.0,
            treatment_complexity: 0.0,
            seriousness: 0.0,
            treatment_cost: 0.0,
        };
        assert!(score_diseases(&matches, &[zero]).is_empty());
    }

    #[test]
    fn test_ranking_sorted_and_truncated() {
        let scored: Vec<ScoredDisease> = (0..7)
            .map(|i| ScoredDisease {
                disease_key: format!("d{i}"),
                label: format!("Disease {i}"),
                diet_key: format!("d{i}_diet"),
                match_ratio: 1.0,
                score: f64::from(i),
            })
            .collect();
        let top = rank_top(scored);
        assert_eq!(top.len(), TOP_DISEASES);
        assert_eq!(top[0].score, 6.0);
        assert!(top.windows(2).all(|w| w[0].score >= w[1].score));
    }

    #[test]
    fn test_tied_scores_keep_catalog_order() {
        // Scenario D: two diseases tie; catalog order is preserved.
        let tie = |key: &str| ScoredDisease {
            disease_key: key.to_string(),
            label: key.to_string(),
            diet_key: format!("{key}_diet"),
            match_ratio: 1.0,
            score: 42.0,
        };
        let top = rank_top(vec![tie("first"), tie("second")]);
        assert_eq!(top[0].disease_key, "first");
        assert_eq!(top[1].disease_key, "second");
    }

    #[test]
    fn test_insights_deduplicated() {
        let service = fixture_service();
        // Both diseases recommend "More fiber" and "Regular exercise".
        let result = service
            .predict(
                45,
                Sex::Female,
                &lab(&[("Glucose", 147.0), ("HbA1c", 7.5), ("Hemoglobin", 10.0)]),
            )
            .expect("prediction succeeds");
        assert_eq!(result.disease_score.len(), 2);
        assert_eq!(
            result.insights.diet.iter().filter(|d| *d == "More fiber").count(),
            1
        );
        assert_eq!(result.insights.lifestyle.len(), 1);
    }

    #[test]
    fn test_missing_diet_profile_contributes_nothing() {
        let top = vec![ScoredDisease {
            disease_key: "hypothyroid".to_string(),
            label: "Hypothyroidism".to_string(),
            diet_key: "thyroid_diet".to_string(),
            match_ratio: 1.0,
            score: 40.0,
        }];
        let insights = aggregate_insights(&top, &fixture_catalogs().diets);
        assert_eq!(insights, Insights::default());
    }

    #[test]
    fn test_non_finite_lab_value_rejected() {
        let service = fixture_service();
        let err = service
            .predict(45, Sex::Male, &lab(&[("Glucose", f64::NAN)]))
            .expect_err("validation fails");
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn test_uninitialized_service_rejects() {
        let service = PredictionService::new();
        assert!(!service.is_initialized());
        let err = service
            .predict(45, Sex::Male, &LabData::new())
            .expect_err("not initialized");
        assert!(matches!(err, Error::NotInitialized(_)));
    }

    #[test]
    fn test_initialize_from_source() {
        struct FixtureSource;

        impl CatalogSource for FixtureSource {
            type Error = CatalogError;

            fn load(&self) -> Result<Catalogs, Self::Error> {
                Ok(fixture_catalogs())
            }
        }

        let mut service = PredictionService::new();
        service.initialize(&FixtureSource).expect("initialize succeeds");
        assert!(service.is_initialized());
        assert!(service.catalogs().is_some());
    }

    #[test]
    fn test_prediction_is_idempotent() {
        let service = fixture_service();
        let input = lab(&[("Glucose", 147.0), ("HbA1c", 7.5), ("Hemoglobin", 10.0)]);
        let first = service.predict(45, Sex::Male, &input).expect("prediction succeeds");
        let second = service.predict(45, Sex::Male, &input).expect("prediction succeeds");
        assert_eq!(
            serde_json::to_string(&first).expect("serializable"),
            serde_json::to_string(&second).expect("serializable")
        );
    }
}
