use fitrec_core::{ActivityLevel, BmiCategory, ExperienceLevel, Gender, Goal};
use serde::{Deserialize, Serialize};

/// Structured plan digest handed to the coaching service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanSummary {
    pub goal: Goal,
    pub confidence: f64,
    pub age: u32,
    pub gender: Gender,
    pub weight_kg: f64,
    pub height_cm: f64,
    pub activity_level: ActivityLevel,
    pub bmi: f64,
    pub bmi_category: BmiCategory,
    pub experience: ExperienceLevel,
    pub intensity: f64,
    pub sessions_per_week: u8,
    /// One line per training day, e.g. "Day 1: HIIT (Burpees, Jump squats)".
    pub workout_highlights: Vec<String>,
    /// One line per diet entry, e.g. "Macros: Protein 25-30%".
    pub diet_highlights: Vec<String>,
}
