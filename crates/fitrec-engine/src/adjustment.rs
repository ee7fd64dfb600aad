//! Turns the similarity signal into a bounded plan adjustment.

use fitrec_core::config::ComposerConfig;
use fitrec_core::{Goal, GoalPrediction};
use fitrec_similarity::SimilaritySignal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// Neighbours favour a different goal than the one the plan is built for.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Disagreement {
    pub goal: Goal,
    /// Share of neighbours with that outcome.
    pub frequency: f64,
    /// How far the neighbour share exceeds classifier confidence, in [0, 1].
    pub strength: f64,
}

/// Adjustment handed to the composer. The classifier keeps the label;
/// similarity only moves intensity and adds diet notes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdjustmentSignal {
    /// 1 - confidence: the less certain the classifier, the more similarity counts.
    pub similarity_weight: f64,
    /// Share of neighbours whose outcome equals the plan goal.
    pub support: f64,
    /// Multiplier on target intensity. Clamped by the composer.
    pub intensity_scale: f64,
    pub neighbors: usize,
    pub dominant: Option<Goal>,
    /// Share of neighbours per outcome. Empty without neighbours.
    pub goal_distribution: BTreeMap<Goal, f64>,
    pub disagreement: Option<Disagreement>,
    /// Diet notes sourced from similar users.
    pub diet_notes: Vec<String>,
}

impl AdjustmentSignal {
    /// No similarity input: plan stays at its template target.
    pub fn neutral() -> Self {
        Self {
            similarity_weight: 0.0,
            support: 0.0,
            intensity_scale: 1.0,
            neighbors: 0,
            dominant: None,
            goal_distribution: BTreeMap::new(),
            disagreement: None,
            diet_notes: Vec::new(),
        }
    }

    /// Adjustment for a plan keyed on the predicted goal.
    pub fn from_similarity(prediction: &GoalPrediction, signal: &SimilaritySignal, config: &ComposerConfig) -> Self {
        Self::for_goal(prediction.goal, prediction.confidence, signal, config)
    }

    /// Adjustment for a plan keyed on `goal`, which the classifier rates at
    /// `confidence`.
    pub fn for_goal(goal: Goal, confidence: f64, signal: &SimilaritySignal, config: &ComposerConfig) -> Self {
        if signal.is_empty() {
            return Self::neutral();
        }
        let confidence = finite_unit(confidence);
        let weight = 1.0 - confidence;
        let support = finite_unit(signal.frequency(goal));
        let swing = config.intensity_swing();

        let raw = 1.0 + weight * (support - 0.5) * 2.0 * swing;
        let intensity_scale = if raw.is_finite() { raw.clamp(1.0 - swing, 1.0 + swing) } else { 1.0 };

        let disagreement = signal.disagreement(goal).map(|(other, frequency)| Disagreement {
            goal: other,
            frequency,
            strength: (frequency - confidence).max(0.0),
        });
        if let Some(d) = &disagreement {
            debug!(
                plan_goal = %goal,
                similar = %d.goal,
                frequency = d.frequency,
                strength = d.strength,
                "similar users disagree with plan goal"
            );
        }

        Self {
            similarity_weight: weight,
            support,
            intensity_scale,
            neighbors: signal.len(),
            dominant: signal.dominant,
            goal_distribution: Goal::ALL.iter().map(|g| (*g, signal.frequency(*g))).collect(),
            disagreement,
            diet_notes: Vec::new(),
        }
    }

    pub fn with_diet_note(mut self, note: impl Into<String>) -> Self {
        self.diet_notes.push(note.into());
        self
    }
}

fn finite_unit(x: f64) -> f64 {
    if x.is_finite() {
        x.clamp(0.0, 1.0)
    } else {
        0.0
    }
}
