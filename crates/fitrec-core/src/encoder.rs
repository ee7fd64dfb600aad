//! Feature encoding shared by the classifier and the similarity search.
//!
//! Layout (version 1):
//!
//! | idx | feature          | encoding            |
//! |-----|------------------|---------------------|
//! | 0   | age              | years / 10          |
//! | 1   | bmi              | kg·m⁻² / 5          |
//! | 2-4 | gender           | one-hot (m, f, o)   |
//! | 5   | activity level   | rank 0..=4          |
//! | 6   | experience level | rank 0..=2          |
//!
//! Vectors from different encoder versions must never be compared.

use serde::{Deserialize, Serialize};

use crate::error::{FitError, Result};
use crate::profile::{Gender, UserProfile};

pub const ENCODER_VERSION: u32 = 1;
pub const FEATURE_DIM: usize = 7;

const AGE_SCALE: f64 = 10.0;
const BMI_SCALE: f64 = 5.0;

pub const FEATURE_NAMES: [&str; FEATURE_DIM] = [
    "age",
    "bmi",
    "gender_male",
    "gender_female",
    "gender_other",
    "activity_rank",
    "experience_rank",
];

/// Encoded profile, tagged with the encoder version that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    pub version: u32,
    pub values: Vec<f64>,
}

impl FeatureVector {
    pub fn new(version: u32, values: Vec<f64>) -> Self {
        Self { version, values }
    }

    pub fn dim(&self) -> usize {
        self.values.len()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    /// Same version and dimension, i.e. distances between the two are meaningful.
    pub fn is_comparable(&self, other: &FeatureVector) -> bool {
        self.version == other.version && self.values.len() == other.values.len()
    }
}

/// Encode a profile. Fails only when an attribute is outside its domain.
pub fn encode(profile: &UserProfile) -> Result<FeatureVector> {
    profile.validate()?;
    let bmi = profile.bmi();
    if !bmi.is_finite() {
        return Err(FitError::validation("height_cm", "derived BMI is not finite"));
    }

    let mut values = Vec::with_capacity(FEATURE_DIM);
    values.push(profile.age as f64 / AGE_SCALE);
    values.push(bmi / BMI_SCALE);
    for g in Gender::ALL {
        values.push(if profile.gender == g { 1.0 } else { 0.0 });
    }
    values.push(profile.activity_level.rank() as f64);
    values.push(profile.experience_level.rank() as f64);

    Ok(FeatureVector::new(ENCODER_VERSION, values))
}
