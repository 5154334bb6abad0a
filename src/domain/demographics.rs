//! Demographic types used to select applicable reference ranges and disease rules.

use serde::{Deserialize, Serialize};

/// Biological sex of the person a report belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    Male,
    Female,
}

impl Sex {
    /// Value of the `userSex` fact handed to the rule evaluator.
    ///
    /// Rule sets are authored against capitalized values ("Male"/"Female"),
    /// matching the stored user profile, while catalog data uses lowercase.
    #[must_use]
    pub fn fact_value(&self) -> &'static str {
        match self {
            Self::Male => "Male",
            Self::Female => "Female",
        }
    }
}

impl std::fmt::Display for Sex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Male => write!(f, "male"),
            Self::Female => write!(f, "female"),
        }
    }
}

/// Sex applicability of a catalog entry (reference range or disease rule).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SexFilter {
    Male,
    Female,
    Both,
}

impl SexFilter {
    /// Whether an entry with this filter applies to the given sex.
    #[must_use]
    pub fn admits(self, sex: Sex) -> bool {
        match self {
            Self::Both => true,
            Self::Male => sex == Sex::Male,
            Self::Female => sex == Sex::Female,
        }
    }
}

impl From<Sex> for SexFilter {
    fn from(sex: Sex) -> Self {
        match sex {
            Sex::Male => Self::Male,
            Sex::Female => Self::Female,
        }
    }
}

impl std::str::FromStr for SexFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "male" => Ok(Self::Male),
            "female" => Ok(Self::Female),
            "both" => Ok(Self::Both),
            other => Err(format!("unknown sex filter '{other}'")),
        }
    }
}

/// Coarse age bucket used to key reference ranges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgeGroup {
    Child,
    Adult,
    Senior,
}

impl AgeGroup {
    /// Resolve the age group for the scoring path.
    ///
    /// The prediction pipeline only distinguishes child and adult. Senior
    /// ranges exist in the reference table but are never produced here.
    #[must_use]
    pub fn from_age(age: u32) -> Self {
        if age < 18 {
            Self::Child
        } else {
            Self::Adult
        }
    }
}

impl std::str::FromStr for AgeGroup {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "child" => Ok(Self::Child),
            "adult" => Ok(Self::Adult),
            "senior" => Ok(Self::Senior),
            other => Err(format!("unknown age group '{other}'")),
        }
    }
}

/// Age-group applicability of a disease definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgeGroupFilter {
    Child,
    Adult,
    Both,
}

impl AgeGroupFilter {
    /// Whether a disease with this filter applies to the given age group.
    #[must_use]
    pub fn admits(self, group: AgeGroup) -> bool {
        match self {
            Self::Both => true,
            Self::Child => group == AgeGroup::Child,
            Self::Adult => group == AgeGroup::Adult,
        }
    }
}
