use fitrec_core::{ExperienceLevel, Goal};
use serde::{Deserialize, Serialize};

/// Plan intensity on the RPE 1-10 scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IntensityBounds {
    /// Lowest intensity that still serves the goal.
    pub floor: f64,
    pub target: f64,
    /// Safe ceiling for the experience tier.
    pub ceiling: f64,
}

impl IntensityBounds {
    pub fn new(floor: f64, target: f64, ceiling: f64) -> Self {
        Self { floor, target, ceiling }
    }

    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.floor, self.ceiling)
    }

    pub fn midpoint(&self) -> f64 {
        (self.floor + self.ceiling) / 2.0
    }

    pub fn is_valid(&self) -> bool {
        self.floor.is_finite()
            && self.ceiling.is_finite()
            && self.floor > 0.0
            && self.floor <= self.target
            && self.target <= self.ceiling
    }
}

/// One training day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutEntry {
    pub day: String,
    pub focus: String,
    pub exercises: Vec<String>,
    pub duration_minutes: u32,
    /// Session load relative to plan intensity (1.0 = main session).
    pub load: f64,
}

/// Guidance for one meal slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DietEntry {
    pub meal: String,
    pub guidance: String,
}

/// Base plan keyed by (goal, experience).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanTemplate {
    pub goal: Goal,
    pub experience: ExperienceLevel,
    pub sessions_per_week: u8,
    pub intensity: IntensityBounds,
    pub workout: Vec<WorkoutEntry>,
    pub diet: Vec<DietEntry>,
}

/// Safety limits per experience tier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TierLimit {
    pub experience: ExperienceLevel,
    pub max_intensity: f64,
    pub max_sessions: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Substitution {
    pub from: String,
    pub to: String,
}

/// Age-band modifier. The band with the greatest `min_age` not above the
/// user's age applies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgeBand {
    pub name: String,
    pub min_age: u32,
    /// Multiplier on target intensity and ceiling; 1.0 leaves them unchanged.
    pub intensity_factor: f64,
    #[serde(default)]
    pub substitutions: Vec<Substitution>,
    #[serde(default)]
    pub notes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperienceNotes {
    pub experience: ExperienceLevel,
    pub notes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalGuidance {
    pub goal: Goal,
    pub tips: Vec<String>,
    /// Appended to the diet plan when similar users leaned towards this goal.
    pub similarity_note: String,
}

/// Serialized form of the reference tables, as written to disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawRuleTables {
    pub templates: Vec<PlanTemplate>,
    pub tier_limits: Vec<TierLimit>,
    pub age_bands: Vec<AgeBand>,
    #[serde(default)]
    pub experience_notes: Vec<ExperienceNotes>,
    #[serde(default)]
    pub general_tips: Vec<String>,
    #[serde(default)]
    pub goal_guidance: Vec<GoalGuidance>,
}

/// Rule engine output for one request: the resolved template after the
/// age-band modifier, plus where it came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BasePlan {
    pub template: PlanTemplate,
    pub requested_experience: ExperienceLevel,
    pub fell_back: bool,
    /// Limits of the tier the template belongs to.
    pub tier_limit: TierLimit,
    pub age_band: Option<String>,
    pub substitutions: Vec<Substitution>,
    pub notes: Vec<String>,
}
