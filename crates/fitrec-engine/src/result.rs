use chrono::{DateTime, Utc};
use fitrec_core::{BmiCategory, ExperienceLevel, Goal};
use fitrec_rules::Substitution;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Where a piece of the plan came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanSource {
    Rules,
    Similarity,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutDay {
    pub day: String,
    pub focus: String,
    pub exercises: Vec<String>,
    pub duration_minutes: u32,
    /// RPE 1-10.
    pub intensity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DietItem {
    pub meal: String,
    pub guidance: String,
    pub source: PlanSource,
}

/// Which adjustments were applied and by whom.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Provenance {
    pub template_goal: Goal,
    /// Goal chosen by the caller; the plan is keyed on it instead of the
    /// predicted label.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requested_goal: Option<Goal>,
    pub template_experience: ExperienceLevel,
    pub requested_experience: ExperienceLevel,
    pub experience_fallback: bool,
    pub age_band: Option<String>,
    pub substitutions: Vec<Substitution>,
    pub intensity_source: PlanSource,
    pub intensity_scale: f64,
    /// Intensity hit the floor or ceiling.
    pub intensity_clamped: bool,
    pub similarity_weight: f64,
    pub similarity_support: f64,
    pub similar_users: usize,
    pub similar_goal: Option<Goal>,
    /// Share of similar users per outcome.
    pub goal_distribution: BTreeMap<Goal, f64>,
    pub disagreement_strength: f64,
}

/// Final recommendation for one request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationResult {
    pub request_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub goal: Goal,
    pub confidence: f64,
    pub probabilities: BTreeMap<Goal, f64>,
    pub workout_plan: Vec<WorkoutDay>,
    pub diet_plan: Vec<DietItem>,
    /// Empty when the coaching service was not asked or did not answer.
    pub coaching_text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coaching_error: Option<String>,
    /// Three-day meal plan text. Empty when not asked for or unavailable.
    pub meal_plan: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meal_plan_error: Option<String>,
    pub intensity: f64,
    pub sessions_per_week: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bmi: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bmi_category: Option<BmiCategory>,
    pub general_tips: Vec<String>,
    pub notes: Vec<String>,
    pub provenance: Provenance,
}

impl RecommendationResult {
    pub fn probability_sum(&self) -> f64 {
        self.probabilities.values().sum()
    }
}

/// Generated meal plan alongside the rule-based diet it was built from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealPlanResult {
    pub request_id: Uuid,
    pub generated_at: DateTime<Utc>,
    /// Predicted goal and its confidence.
    pub goal: Goal,
    pub confidence: f64,
    /// Goal the diet is keyed on.
    pub plan_goal: Goal,
    pub bmi: f64,
    pub bmi_category: BmiCategory,
    pub diet_plan: Vec<DietItem>,
    /// Empty when the coaching service did not answer.
    pub meal_plan: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coaching_error: Option<String>,
}
