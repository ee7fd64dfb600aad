//! Merges the rule-based plan with the similarity adjustment.

use chrono::Utc;
use fitrec_core::config::ComposerConfig;
use fitrec_core::GoalPrediction;
use fitrec_rules::BasePlan;
use uuid::Uuid;

use crate::adjustment::AdjustmentSignal;
use crate::result::*;

#[derive(Debug, Clone)]
pub struct PlanComposer {
    config: ComposerConfig,
}

impl Default for PlanComposer {
    fn default() -> Self {
        Self::new(ComposerConfig::default())
    }
}

impl PlanComposer {
    pub fn new(config: ComposerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ComposerConfig {
        &self.config
    }

    /// Build the final plan. Total: any adjustment signal, however out of
    /// range, is clamped into the template's bounds.
    pub fn compose(&self, prediction: &GoalPrediction, base: &BasePlan, adjustment: &AdjustmentSignal) -> RecommendationResult {
        let template = &base.template;
        let bounds = template.intensity;
        let floor = bounds.floor;
        let ceiling = bounds.ceiling.min(base.tier_limit.max_intensity).max(floor);

        let swing = self.config.intensity_swing();
        let scale = if adjustment.intensity_scale.is_finite() {
            adjustment.intensity_scale.clamp(1.0 - swing, 1.0 + swing)
        } else {
            1.0
        };
        let wanted = bounds.target * scale;
        let intensity = wanted.clamp(floor, ceiling);
        let intensity_clamped = intensity != wanted;

        let base_sessions = template.sessions_per_week.max(1);
        let lo = base_sessions.saturating_sub(1).max(1);
        let hi = base_sessions.saturating_add(1).min(base.tier_limit.max_sessions.max(base_sessions));
        let sessions_per_week = ((base_sessions as f64 * scale).round() as u8).clamp(lo, hi);

        let workout_plan = template
            .workout
            .iter()
            .cycle()
            .take(sessions_per_week as usize)
            .enumerate()
            .map(|(i, entry)| {
                WorkoutDay {
                    day: format!("Day {}", i + 1),
                    focus: entry.focus.clone(),
                    exercises: entry.exercises.clone(),
                    duration_minutes: entry.duration_minutes,
                    intensity: (intensity * entry.load).clamp(floor, intensity),
                }
            })
            .collect();

        let mut diet_plan: Vec<DietItem> = template
            .diet
            .iter()
            .map(|d| DietItem { meal: d.meal.clone(), guidance: d.guidance.clone(), source: PlanSource::Rules })
            .collect();
        diet_plan.extend(adjustment.diet_notes.iter().map(|note| DietItem {
            meal: "Similar users".into(),
            guidance: note.clone(),
            source: PlanSource::Similarity,
        }));

        let mut notes = base.notes.clone();
        if base.fell_back {
            notes.push(format!(
                "No {} plan for {}; using the {} plan",
                base.requested_experience,
                template.goal.display_name(),
                template.experience
            ));
        }
        for s in &base.substitutions {
            notes.push(format!("{} replaced by {} (lower impact)", s.from, s.to));
        }
        if let Some(d) = &adjustment.disagreement {
            notes.push(format!(
                "{:.0}% of similar users pursued {}",
                d.frequency * 100.0,
                d.goal.display_name()
            ));
        }

        let provenance = Provenance {
            template_goal: template.goal,
            requested_goal: None,
            template_experience: template.experience,
            requested_experience: base.requested_experience,
            experience_fallback: base.fell_back,
            age_band: base.age_band.clone(),
            substitutions: base.substitutions.clone(),
            intensity_source: if scale != 1.0 { PlanSource::Similarity } else { PlanSource::Rules },
            intensity_scale: scale,
            intensity_clamped,
            similarity_weight: adjustment.similarity_weight,
            similarity_support: adjustment.support,
            similar_users: adjustment.neighbors,
            similar_goal: adjustment.dominant,
            goal_distribution: adjustment.goal_distribution.clone(),
            disagreement_strength: adjustment.disagreement.map(|d| d.strength).unwrap_or(0.0),
        };

        RecommendationResult {
            request_id: Uuid::new_v4(),
            generated_at: Utc::now(),
            goal: prediction.goal,
            confidence: prediction.confidence,
            probabilities: prediction.probabilities.clone(),
            workout_plan,
            diet_plan,
            coaching_text: String::new(),
            coaching_error: None,
            meal_plan: String::new(),
            meal_plan_error: None,
            intensity,
            sessions_per_week,
            bmi: None,
            bmi_category: None,
            general_tips: Vec::new(),
            notes,
            provenance,
        }
    }
}
