use fitrec_core::{ExperienceLevel, Goal};
use tracing::debug;

use crate::tables::RuleTables;
use crate::types::*;

/// Deterministic plan lookup over validated tables.
#[derive(Debug, Clone)]
pub struct RuleEngine {
    tables: RuleTables,
}

impl RuleEngine {
    pub fn new(tables: RuleTables) -> Self {
        Self { tables }
    }

    pub fn tables(&self) -> &RuleTables {
        &self.tables
    }

    /// Template for (goal, experience). A missing tier resolves to the
    /// nearest lower tier; never fails on validated tables.
    pub fn base_plan(&self, goal: Goal, experience: ExperienceLevel) -> &PlanTemplate {
        self.tables.resolve(goal, experience).0
    }

    /// Base plan with the age-band modifier and guidance notes applied.
    pub fn plan_for(&self, goal: Goal, experience: ExperienceLevel, age: u32) -> BasePlan {
        let (template, fell_back) = self.tables.resolve(goal, experience);
        if fell_back {
            debug!(
                goal = %goal,
                requested = %experience,
                used = %template.experience,
                "no template for tier, using lower tier"
            );
        }

        let mut template = template.clone();
        let mut notes: Vec<String> = self.tables.experience_notes(experience).to_vec();
        let mut applied = Vec::new();
        let band = self.tables.age_band(age);

        if let Some(band) = band {
            applied = apply_substitutions(&mut template.workout, &band.substitutions);
            template.intensity = scale_intensity(template.intensity, band.intensity_factor);
            notes.extend(band.notes.iter().cloned());
            if !applied.is_empty() {
                debug!(band = %band.name, count = applied.len(), "applied age-band substitutions");
            }
        }

        let tier_limit = *self.tables.tier_limit(template.experience);
        BasePlan {
            template,
            requested_experience: experience,
            fell_back,
            tier_limit,
            age_band: band.map(|b| b.name.clone()),
            substitutions: applied,
            notes,
        }
    }

    /// Common tips followed by goal-specific ones.
    pub fn general_tips(&self, goal: Goal) -> Vec<String> {
        let mut tips = self.tables.general_tips().to_vec();
        if let Some(g) = self.tables.goal_guidance(goal) {
            tips.extend(g.tips.iter().cloned());
        }
        tips
    }

    pub fn similarity_note(&self, goal: Goal) -> Option<&str> {
        self.tables
            .goal_guidance(goal)
            .map(|g| g.similarity_note.as_str())
            .filter(|n| !n.is_empty())
    }
}

/// Replace exercises named in the substitution table. Returns the
/// substitutions that matched at least once, in table order.
fn apply_substitutions(workout: &mut [WorkoutEntry], table: &[Substitution]) -> Vec<Substitution> {
    let mut used = vec![false; table.len()];
    for entry in workout.iter_mut() {
        for exercise in entry.exercises.iter_mut() {
            if let Some(i) = table.iter().position(|s| s.from.eq_ignore_ascii_case(exercise)) {
                *exercise = table[i].to.clone();
                used[i] = true;
            }
        }
    }
    table
        .iter()
        .zip(used)
        .filter(|(_, u)| *u)
        .map(|(s, _)| s.clone())
        .collect()
}

/// Lowers target and ceiling by `factor`, never below the floor.
fn scale_intensity(bounds: IntensityBounds, factor: f64) -> IntensityBounds {
    if factor >= 1.0 {
        return bounds;
    }
    let ceiling = (bounds.ceiling * factor).max(bounds.floor);
    let target = (bounds.target * factor).clamp(bounds.floor, ceiling);
    IntensityBounds::new(bounds.floor, target, ceiling)
}
