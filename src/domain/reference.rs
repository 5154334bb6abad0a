//! Reference range table: expected [min, max] intervals per biomarker and
//! demographic bucket, with ordered fallback resolution.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::{AgeGroup, Sex, SexFilter};

/// Expected normal interval for a biomarker.
///
/// An absent bound means the range is unbounded on that side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceRange {
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub unit: String,
}

/// Where a measured value falls relative to a reference range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RangeStatus {
    Below,
    Within,
    Above,
}

impl ReferenceRange {
    /// Classify a measured value against this range.
    #[must_use]
    pub fn classify(&self, value: f64) -> RangeStatus {
        if self.min.is_some_and(|min| value < min) {
            RangeStatus::Below
        } else if self.max.is_some_and(|max| value > max) {
            RangeStatus::Above
        } else {
            RangeStatus::Within
        }
    }

    /// Whether a measured value falls outside this range.
    #[must_use]
    pub fn is_out_of_range(&self, value: f64) -> bool {
        self.classify(value) != RangeStatus::Within
    }

    /// Human-readable rendition, e.g. "70-100 mg/dL" or "<200 mg/dL".
    #[must_use]
    pub fn display(&self) -> String {
        match (self.min, self.max) {
            (Some(min), Some(max)) => format!("{min}-{max} {}", self.unit),
            (None, Some(max)) => format!("<{max} {}", self.unit),
            (Some(min), None) => format!(">{min} {}", self.unit),
            (None, None) => "unbounded".to_string(),
        }
    }
}

/// Static table of reference ranges keyed by (biomarker, age group, sex).
///
/// Built once at startup and treated as read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct ReferenceTable {
    ranges: HashMap<String, HashMap<(AgeGroup, SexFilter), ReferenceRange>>,
}

impl ReferenceTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a range for the given composite key, replacing any existing one.
    pub fn insert(
        &mut self,
        biomarker: impl Into<String>,
        age_group: AgeGroup,
        sex: SexFilter,
        range: ReferenceRange,
    ) {
        self.ranges
            .entry(biomarker.into())
            .or_default()
            .insert((age_group, sex), range);
    }

    /// Number of distinct biomarkers in the table.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Resolve the applicable range for a biomarker and demographic context.
    ///
    /// Candidate keys are tried in order:
    /// 1. (age group, sex)
    /// 2. (age group, both)
    /// 3. (adult, both)
    ///
    /// Returns `None` when no candidate is present; callers must treat the
    /// absent branch as "no range known", never as an error.
    #[must_use]
    pub fn resolve(&self, biomarker: &str, age_group: AgeGroup, sex: Sex) -> Option<&ReferenceRange> {
        let by_demo = self.ranges.get(biomarker)?;
        let candidates = [
            (age_group, SexFilter::from(sex)),
            (age_group, SexFilter::Both),
            (AgeGroup::Adult, SexFilter::Both),
        ];
        candidates.iter().find_map(|key| by_demo.get(key))
    }

    /// Classify a measured value using the resolved range, if any.
    #[must_use]
    pub fn classify(
        &self,
        biomarker: &str,
        value: f64,
        age_group: AgeGroup,
        sex: Sex,
    ) -> Option<RangeStatus> {
        self.resolve(biomarker, age_group, sex)
            .map(|range| range.classify(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range(min: Option<f64>, max: Option<f64>) -> ReferenceRange {
        ReferenceRange {
            min,
            max,
            unit: "mg/dL".to_string(),
        }
    }

    fn sample_table() -> ReferenceTable {
        let mut table = ReferenceTable::new();
        table.insert("Glucose", AgeGroup::Adult, SexFilter::Both, range(Some(70.0), Some(100.0)));
        table.insert("Glucose", AgeGroup::Child, SexFilter::Both, range(Some(60.0), Some(100.0)));
        table.insert(
            "HDL Cholesterol",
            AgeGroup::Adult,
            SexFilter::Male,
            range(Some(40.0), None),
        );
        table.insert(
            "HDL Cholesterol",
            AgeGroup::Adult,
            SexFilter::Female,
            range(Some(50.0), None),
        );
        table
    }

    #[test]
    fn test_exact_resolution() {
        let table = sample_table();
        let r = table
            .resolve("HDL Cholesterol", AgeGroup::Adult, Sex::Female)
            .expect("range present");
        assert_eq!(r.min, Some(50.0));
    }

    #[test]
    fn test_fallback_to_both() {
        let table = sample_table();
        // No (child, male) entry; falls back to (child, both).
        let r = table
            .resolve("Glucose", AgeGroup::Child, Sex::Male)
            .expect("range present");
        assert_eq!(r.min, Some(60.0));
    }

    #[test]
    fn test_fallback_to_adult_both() {
        let table = sample_table();
        // No senior entries at all; falls back to (adult, both).
        let r = table
            .resolve("Glucose", AgeGroup::Senior, Sex::Female)
            .expect("range present");
        assert_eq!(r.max, Some(100.0));
    }

    #[test]
    fn test_unknown_biomarker_is_none() {
        let table = sample_table();
        assert!(table.resolve("Ferritin", AgeGroup::Adult, Sex::Male).is_none());
        // Sex-specific entries with no "both" fallback stay unresolved
        // for senior lookups.
        assert!(table
            .resolve("HDL Cholesterol", AgeGroup::Senior, Sex::Male)
            .is_none());
    }

    #[test]
    fn test_classification() {
        let r = range(Some(70.0), Some(100.0));
        assert_eq!(r.classify(65.0), RangeStatus::Below);
        assert_eq!(r.classify(85.0), RangeStatus::Within);
        assert_eq!(r.classify(147.0), RangeStatus::Above);
        assert!(r.is_out_of_range(147.0));
        assert!(!r.is_out_of_range(100.0));
    }

    #[test]
    fn test_unbounded_sides() {
        let open_low = range(None, Some(200.0));
        assert_eq!(open_low.classify(-50.0), RangeStatus::Within);
        assert_eq!(open_low.classify(250.0), RangeStatus::Above);

        let open_high = range(Some(40.0), None);
        assert_eq!(open_high.classify(1000.0), RangeStatus::Within);
        assert_eq!(open_high.classify(30.0), RangeStatus::Below);
    }

    #[test]
    fn test_display() {
        assert_eq!(range(Some(70.0), Some(100.0)).display(), "70-100 mg/dL");
        assert_eq!(range(None, Some(200.0)).display(), "<200 mg/dL");
        assert_eq!(range(Some(40.0), None).display(), ">40 mg/dL");
    }
}
