//! User attributes accepted by the recommendation engine.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{FitError, Result};

pub const MIN_AGE: u32 = 10;
pub const MAX_AGE: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    #[serde(alias = "Male", alias = "m")]
    Male,
    #[serde(alias = "Female", alias = "f")]
    Female,
    #[serde(alias = "Other")]
    Other,
}

impl Gender {
    pub const ALL: [Gender; 3] = [Gender::Male, Gender::Female, Gender::Other];
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Gender::Male => write!(f, "male"),
            Gender::Female => write!(f, "female"),
            Gender::Other => write!(f, "other"),
        }
    }
}

/// Ordered activity level; the declaration order is the rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    #[serde(alias = "Sedentary")]
    Sedentary,
    #[serde(alias = "Light", alias = "Low", alias = "low")]
    Light,
    #[serde(alias = "Moderate")]
    Moderate,
    #[serde(alias = "Active", alias = "High", alias = "high")]
    Active,
    #[serde(alias = "Very Active", alias = "Very High", alias = "very_high")]
    VeryActive,
}

impl ActivityLevel {
    pub const ALL: [ActivityLevel; 5] = [
        ActivityLevel::Sedentary,
        ActivityLevel::Light,
        ActivityLevel::Moderate,
        ActivityLevel::Active,
        ActivityLevel::VeryActive,
    ];

    pub fn rank(self) -> usize {
        self as usize
    }
}

impl fmt::Display for ActivityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ActivityLevel::Sedentary => "sedentary",
            ActivityLevel::Light => "light",
            ActivityLevel::Moderate => "moderate",
            ActivityLevel::Active => "active",
            ActivityLevel::VeryActive => "very_active",
        };
        f.write_str(s)
    }
}

/// Ordered training experience tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExperienceLevel {
    #[serde(alias = "Beginner")]
    Beginner,
    #[serde(alias = "Intermediate")]
    Intermediate,
    #[serde(alias = "Advanced")]
    Advanced,
}

impl ExperienceLevel {
    pub const ALL: [ExperienceLevel; 3] = [
        ExperienceLevel::Beginner,
        ExperienceLevel::Intermediate,
        ExperienceLevel::Advanced,
    ];

    pub fn rank(self) -> usize {
        self as usize
    }

    /// The next more conservative tier, if any.
    pub fn lower(self) -> Option<Self> {
        match self {
            ExperienceLevel::Advanced => Some(ExperienceLevel::Intermediate),
            ExperienceLevel::Intermediate => Some(ExperienceLevel::Beginner),
            ExperienceLevel::Beginner => None,
        }
    }
}

impl Default for ExperienceLevel {
    fn default() -> Self {
        Self::Beginner
    }
}

impl fmt::Display for ExperienceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ExperienceLevel::Beginner => "beginner",
            ExperienceLevel::Intermediate => "intermediate",
            ExperienceLevel::Advanced => "advanced",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BmiCategory {
    Underweight,
    Normal,
    Overweight,
    Obese,
}

impl BmiCategory {
    pub fn from_bmi(bmi: f64) -> Self {
        if bmi < 18.5 {
            Self::Underweight
        } else if bmi < 25.0 {
            Self::Normal
        } else if bmi < 30.0 {
            Self::Overweight
        } else {
            Self::Obese
        }
    }
}

impl fmt::Display for BmiCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BmiCategory::Underweight => "underweight",
            BmiCategory::Normal => "normal",
            BmiCategory::Overweight => "overweight",
            BmiCategory::Obese => "obese",
        };
        f.write_str(s)
    }
}

/// Raw user attributes. BMI is always derived, never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub age: u32,
    #[serde(alias = "weight")]
    pub weight_kg: f64,
    #[serde(alias = "height")]
    pub height_cm: f64,
    pub gender: Gender,
    pub activity_level: ActivityLevel,
    #[serde(default)]
    pub experience_level: ExperienceLevel,
}

impl UserProfile {
    /// Build a profile, rejecting attributes outside their domain.
    pub fn new(
        age: u32,
        weight_kg: f64,
        height_cm: f64,
        gender: Gender,
        activity_level: ActivityLevel,
        experience_level: ExperienceLevel,
    ) -> Result<Self> {
        let profile = Self { age, weight_kg, height_cm, gender, activity_level, experience_level };
        profile.validate()?;
        Ok(profile)
    }

    pub fn validate(&self) -> Result<()> {
        if !(MIN_AGE..=MAX_AGE).contains(&self.age) {
            return Err(FitError::validation(
                "age",
                format!("{} is outside {MIN_AGE}..={MAX_AGE}", self.age),
            ));
        }
        if !self.weight_kg.is_finite() || self.weight_kg <= 0.0 {
            return Err(FitError::validation("weight_kg", format!("{} must be positive", self.weight_kg)));
        }
        if !self.height_cm.is_finite() || self.height_cm <= 0.0 {
            return Err(FitError::validation("height_cm", format!("{} must be positive", self.height_cm)));
        }
        Ok(())
    }

    pub fn bmi(&self) -> f64 {
        let m = self.height_cm / 100.0;
        self.weight_kg / (m * m)
    }

    pub fn bmi_category(&self) -> BmiCategory {
        BmiCategory::from_bmi(self.bmi())
    }
}
