//! The immutable catalog bundle shared by all predictions.

use super::{DietProfile, DiseaseDefinition, ReferenceTable, ScoreWeights};

/// All static catalogs, loaded once at startup and passed by reference into
/// every pipeline function. Never mutated after construction, so it is safe
/// to share across threads without locking.
#[derive(Debug, Clone, Default)]
pub struct Catalogs {
    pub reference: ReferenceTable,
    pub diseases: Vec<DiseaseDefinition>,
    pub weights: Vec<ScoreWeights>,
    pub diets: Vec<DietProfile>,
}

impl Catalogs {
    #[must_use]
    pub fn new(
        reference: ReferenceTable,
        diseases: Vec<DiseaseDefinition>,
        weights: Vec<ScoreWeights>,
        diets: Vec<DietProfile>,
    ) -> Self {
        Self {
            reference,
            diseases,
            weights,
            diets,
        }
    }
}
