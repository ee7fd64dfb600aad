//! Goal labels and classifier output.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::FitError;

/// Fitness goal label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Goal {
    #[serde(alias = "Weight Loss")]
    WeightLoss,
    #[serde(alias = "Muscle Gain")]
    MuscleGain,
    #[serde(alias = "Endurance")]
    Endurance,
    #[serde(alias = "Maintenance")]
    Maintenance,
}

impl Goal {
    pub const COUNT: usize = 4;
    pub const ALL: [Goal; Goal::COUNT] = [
        Goal::WeightLoss,
        Goal::MuscleGain,
        Goal::Endurance,
        Goal::Maintenance,
    ];

    /// Position in `Goal::ALL`; the column index of probability arrays.
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(idx: usize) -> Option<Self> {
        Self::ALL.get(idx).copied()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Goal::WeightLoss => "weight_loss",
            Goal::MuscleGain => "muscle_gain",
            Goal::Endurance => "endurance",
            Goal::Maintenance => "maintenance",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Goal::WeightLoss => "Weight Loss",
            Goal::MuscleGain => "Muscle Gain",
            Goal::Endurance => "Endurance",
            Goal::Maintenance => "Maintenance",
        }
    }
}

impl fmt::Display for Goal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Goal {
    type Err = FitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace([' ', '-'], "_").as_str() {
            "weight_loss" => Ok(Goal::WeightLoss),
            "muscle_gain" => Ok(Goal::MuscleGain),
            "endurance" => Ok(Goal::Endurance),
            "maintenance" => Ok(Goal::Maintenance),
            other => Err(FitError::validation("goal", format!("unknown goal '{other}'"))),
        }
    }
}

/// Classifier output: top label plus the full probability simplex.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalPrediction {
    pub goal: Goal,
    pub confidence: f64,
    pub probabilities: BTreeMap<Goal, f64>,
}

impl GoalPrediction {
    /// Build a prediction from raw per-class scores.
    ///
    /// Negative and non-finite scores count as zero. The scores are
    /// normalised to sum to 1; an all-zero input becomes uniform. Ties for
    /// the top label resolve to the earliest goal in `Goal::ALL`.
    pub fn from_scores(scores: [f64; Goal::COUNT]) -> Self {
        let mut clean = scores.map(|s| if s.is_finite() && s > 0.0 { s } else { 0.0 });
        let total: f64 = clean.iter().sum();
        if total > 0.0 {
            for s in clean.iter_mut() {
                *s /= total;
            }
        } else {
            clean = [1.0 / Goal::COUNT as f64; Goal::COUNT];
        }

        let mut best = 0;
        for (i, &p) in clean.iter().enumerate() {
            if p > clean[best] {
                best = i;
            }
        }

        Self {
            goal: Goal::ALL[best],
            confidence: clean[best],
            probabilities: Goal::ALL.iter().copied().zip(clean).collect(),
        }
    }

    pub fn probability(&self, goal: Goal) -> f64 {
        self.probabilities.get(&goal).copied().unwrap_or(0.0)
    }

    pub fn as_array(&self) -> [f64; Goal::COUNT] {
        Goal::ALL.map(|g| self.probability(g))
    }
}
