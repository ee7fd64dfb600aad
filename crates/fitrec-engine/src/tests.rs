use crate::*;
use fitrec_core::config::{ComposerConfig, MAX_INTENSITY_SWING};
use fitrec_core::{ExperienceLevel, Goal, GoalPrediction};
use fitrec_rules::{RuleEngine, RuleTables};
use fitrec_similarity::{Neighbor, SimilaritySignal};

fn rules() -> RuleEngine {
    RuleEngine::new(RuleTables::builtin().unwrap())
}

fn prediction(goal: Goal, confidence: f64) -> GoalPrediction {
    let rest = (1.0 - confidence) / 3.0;
    let mut scores = [rest; Goal::COUNT];
    scores[goal.index()] = confidence;
    GoalPrediction::from_scores(scores)
}

fn signal(outcomes: &[Goal]) -> SimilaritySignal {
    SimilaritySignal::from_neighbors(
        outcomes
            .iter()
            .enumerate()
            .map(|(i, g)| Neighbor { index: i, distance: i as f64, outcome: *g })
            .collect(),
    )
}

fn with_scale(scale: f64) -> AdjustmentSignal {
    AdjustmentSignal { intensity_scale: scale, ..AdjustmentSignal::neutral() }
}

// ========== Adjustment Signal ==========

#[test]
fn test_empty_signal_is_neutral() {
    let a = AdjustmentSignal::from_similarity(
        &prediction(Goal::WeightLoss, 0.4),
        &SimilaritySignal::empty(),
        &ComposerConfig::default(),
    );
    assert_eq!(a, AdjustmentSignal::neutral());
}

#[test]
fn test_confident_classifier_ignores_similarity() {
    let a = AdjustmentSignal::from_similarity(
        &prediction(Goal::WeightLoss, 1.0),
        &signal(&[Goal::Endurance; 10]),
        &ComposerConfig::default(),
    );
    assert_eq!(a.similarity_weight, 0.0);
    assert!((a.intensity_scale - 1.0).abs() < 1e-12);
}

#[test]
fn test_agreeing_neighbours_raise_intensity() {
    let a = AdjustmentSignal::from_similarity(
        &prediction(Goal::Endurance, 0.4),
        &signal(&[Goal::Endurance; 10]),
        &ComposerConfig::default(),
    );
    assert!((a.support - 1.0).abs() < 1e-12);
    assert!(a.intensity_scale > 1.0 && a.intensity_scale <= 1.1 + 1e-12);
    assert!(a.disagreement.is_none());
}

#[test]
fn test_disagreeing_neighbours_lower_intensity() {
    let p = prediction(Goal::MuscleGain, 0.4);
    let a = AdjustmentSignal::from_similarity(
        &p,
        &signal(&[Goal::Endurance, Goal::Endurance, Goal::Endurance, Goal::MuscleGain]),
        &ComposerConfig::default(),
    );
    assert!(a.intensity_scale < 1.0 && a.intensity_scale >= 0.9 - 1e-12);
    let d = a.disagreement.unwrap();
    assert_eq!(d.goal, Goal::Endurance);
    assert!((d.frequency - 0.75).abs() < 1e-12);
    assert!((d.strength - (0.75 - p.confidence)).abs() < 1e-12);
    assert_eq!(a.dominant, Some(Goal::Endurance));
}

#[test]
fn test_disagreement_strength_never_negative() {
    let a = AdjustmentSignal::from_similarity(
        &prediction(Goal::WeightLoss, 0.9),
        &signal(&[Goal::Maintenance, Goal::Maintenance, Goal::WeightLoss]),
        &ComposerConfig::default(),
    );
    assert_eq!(a.disagreement.unwrap().strength, 0.0);
}

#[test]
fn test_classifier_keeps_label() {
    let e = rules();
    let p = prediction(Goal::WeightLoss, 0.3);
    let a = AdjustmentSignal::from_similarity(&p, &signal(&[Goal::Endurance; 10]), &ComposerConfig::default());
    let base = e.plan_for(p.goal, ExperienceLevel::Beginner, 30);
    let r = PlanComposer::default().compose(&p, &base, &a);
    assert_eq!(r.goal, Goal::WeightLoss);
    assert_eq!(r.provenance.template_goal, Goal::WeightLoss);
    assert_eq!(r.provenance.similar_goal, Some(Goal::Endurance));
}

#[test]
fn test_goal_distribution_carried_to_provenance() {
    let e = rules();
    let p = prediction(Goal::MuscleGain, 0.4);
    let a = AdjustmentSignal::from_similarity(
        &p,
        &signal(&[Goal::Endurance, Goal::Endurance, Goal::Endurance, Goal::MuscleGain]),
        &ComposerConfig::default(),
    );
    assert_eq!(a.goal_distribution[&Goal::Endurance], 0.75);
    assert_eq!(a.goal_distribution[&Goal::MuscleGain], 0.25);
    assert_eq!(a.goal_distribution[&Goal::Maintenance], 0.0);

    let base = e.plan_for(Goal::MuscleGain, ExperienceLevel::Beginner, 30);
    let r = PlanComposer::default().compose(&p, &base, &a);
    assert_eq!(r.provenance.goal_distribution, a.goal_distribution);
    assert!(AdjustmentSignal::neutral().goal_distribution.is_empty());
}

#[test]
fn test_chosen_goal_measures_support_for_that_goal() {
    let a = AdjustmentSignal::for_goal(
        Goal::Endurance,
        0.2,
        &signal(&[Goal::Endurance, Goal::Endurance, Goal::WeightLoss, Goal::WeightLoss]),
        &ComposerConfig::default(),
    );
    assert_eq!(a.support, 0.5);
    assert!((a.similarity_weight - 0.8).abs() < 1e-12);
    assert!(a.disagreement.is_none());
}

#[test]
fn test_adjustment_and_composer_share_swing_limit() {
    let e = rules();
    let config = ComposerConfig { max_intensity_swing: 0.9, ..ComposerConfig::default() };
    let a = AdjustmentSignal::for_goal(Goal::Endurance, 0.0, &signal(&[Goal::Endurance; 10]), &config);
    assert!((a.intensity_scale - (1.0 + MAX_INTENSITY_SWING)).abs() < 1e-12);

    let base = e.plan_for(Goal::Endurance, ExperienceLevel::Beginner, 30);
    let r = PlanComposer::new(config).compose(&prediction(Goal::Endurance, 0.5), &base, &a);
    assert!((r.provenance.intensity_scale - a.intensity_scale).abs() < 1e-12);
}

// ========== Composer ==========

#[test]
fn test_neutral_compose_uses_template() {
    let e = rules();
    let p = prediction(Goal::WeightLoss, 0.8);
    let base = e.plan_for(Goal::WeightLoss, ExperienceLevel::Beginner, 30);
    let r = PlanComposer::default().compose(&p, &base, &AdjustmentSignal::neutral());

    assert_eq!(r.intensity, base.template.intensity.target);
    assert_eq!(r.sessions_per_week, base.template.sessions_per_week);
    assert_eq!(r.workout_plan.len(), base.template.sessions_per_week as usize);
    assert_eq!(r.workout_plan[0].day, "Day 1");
    assert_eq!(r.workout_plan[0].exercises, base.template.workout[0].exercises);
    assert_eq!(r.provenance.intensity_source, PlanSource::Rules);
    assert!(!r.provenance.intensity_clamped);
    assert!(r.coaching_text.is_empty());
}

#[test]
fn test_intensity_bounds_hold_for_extreme_signals() {
    let e = rules();
    let composer = PlanComposer::default();
    let scales = [f64::NAN, f64::INFINITY, f64::NEG_INFINITY, -100.0, 0.0, 0.5, 1.0, 1.5, 1e12];
    for goal in Goal::ALL {
        for exp in ExperienceLevel::ALL {
            for age in [18, 30, 45, 70] {
                let base = e.plan_for(goal, exp, age);
                let b = base.template.intensity;
                for &scale in &scales {
                    let r = composer.compose(&prediction(goal, 0.5), &base, &with_scale(scale));
                    assert!(r.intensity >= b.floor && r.intensity <= b.ceiling, "{goal} {exp} {age} {scale}");
                    assert!(r.intensity <= e.tables().tier_limit(exp).max_intensity);
                    for day in &r.workout_plan {
                        assert!(day.intensity >= b.floor && day.intensity <= b.ceiling);
                    }
                    assert!(r.sessions_per_week >= 1);
                    assert!(r.sessions_per_week <= base.tier_limit.max_sessions);
                }
            }
        }
    }
}

#[test]
fn test_out_of_range_swing_is_clamped() {
    let e = rules();
    let composer = PlanComposer::new(ComposerConfig { max_intensity_swing: 50.0, ..ComposerConfig::default() });
    let base = e.plan_for(Goal::Endurance, ExperienceLevel::Intermediate, 30);
    let r = composer.compose(&prediction(Goal::Endurance, 0.5), &base, &with_scale(-3.0));
    assert!(r.intensity >= base.template.intensity.floor);
}

#[test]
fn test_scale_within_swing_moves_intensity() {
    let e = rules();
    let base = e.plan_for(Goal::MuscleGain, ExperienceLevel::Intermediate, 30);
    let r = PlanComposer::default().compose(&prediction(Goal::MuscleGain, 0.5), &base, &with_scale(0.95));
    assert!((r.intensity - 7.0 * 0.95).abs() < 1e-9);
    assert_eq!(r.provenance.intensity_source, PlanSource::Similarity);
}

#[test]
fn test_ceiling_clamp_recorded() {
    let e = rules();
    // Advanced muscle gain: target 9.0, ceiling 9.5; 9.0 * 1.1 = 9.9.
    let base = e.plan_for(Goal::MuscleGain, ExperienceLevel::Advanced, 30);
    let r = PlanComposer::default().compose(&prediction(Goal::MuscleGain, 0.5), &base, &with_scale(1.1));
    assert_eq!(r.intensity, 9.5);
    assert!(r.provenance.intensity_clamped);
}

#[test]
fn test_sessions_move_at_most_one() {
    let e = rules();
    let base = e.plan_for(Goal::WeightLoss, ExperienceLevel::Advanced, 30);
    let n = base.template.sessions_per_week;
    for scale in [0.0, 0.9, 1.0, 1.1, 10.0] {
        let r = PlanComposer::default().compose(&prediction(Goal::WeightLoss, 0.5), &base, &with_scale(scale));
        assert!(r.sessions_per_week + 1 >= n && r.sessions_per_week <= n + 1);
    }
}

#[test]
fn test_workout_rotation_cycles() {
    let e = rules();
    let mut base = e.plan_for(Goal::Maintenance, ExperienceLevel::Beginner, 30);
    base.template.sessions_per_week = 4;
    base.template.workout.truncate(2);
    let r = PlanComposer::default().compose(&prediction(Goal::Maintenance, 0.5), &base, &AdjustmentSignal::neutral());
    let days: Vec<&str> = r.workout_plan.iter().map(|d| d.day.as_str()).collect();
    assert_eq!(days, vec!["Day 1", "Day 2", "Day 3", "Day 4"]);
    assert_eq!(r.workout_plan[2].focus, r.workout_plan[0].focus);
}

#[test]
fn test_empty_workout_is_total() {
    let e = rules();
    let mut base = e.plan_for(Goal::Maintenance, ExperienceLevel::Beginner, 30);
    base.template.workout.clear();
    let r = PlanComposer::default().compose(&prediction(Goal::Maintenance, 0.5), &base, &with_scale(1.05));
    assert!(r.workout_plan.is_empty());
}

#[test]
fn test_diet_notes_are_additive() {
    let e = rules();
    let base = e.plan_for(Goal::WeightLoss, ExperienceLevel::Beginner, 30);
    let a = AdjustmentSignal::neutral().with_diet_note("Extra protein helped similar users");
    let r = PlanComposer::default().compose(&prediction(Goal::WeightLoss, 0.5), &base, &a);

    let n = base.template.diet.len();
    assert_eq!(r.diet_plan.len(), n + 1);
    for (item, entry) in r.diet_plan.iter().zip(&base.template.diet) {
        assert_eq!(item.meal, entry.meal);
        assert_eq!(item.guidance, entry.guidance);
        assert_eq!(item.source, PlanSource::Rules);
    }
    assert_eq!(r.diet_plan[n].source, PlanSource::Similarity);
    assert_eq!(r.diet_plan[n].guidance, "Extra protein helped similar users");
}

#[test]
fn test_fallback_and_substitution_notes() {
    let e = rules();
    let base = e.plan_for(Goal::Maintenance, ExperienceLevel::Advanced, 60);
    let r = PlanComposer::default().compose(&prediction(Goal::Maintenance, 0.5), &base, &AdjustmentSignal::neutral());
    assert!(r.provenance.experience_fallback);
    assert!(r.notes.iter().any(|n| n.starts_with("No advanced plan for Maintenance")));
    assert!(r.notes.iter().any(|n| n.contains("replaced by")));
    assert_eq!(r.provenance.age_band.as_deref(), Some("50_plus"));
}

#[test]
fn test_result_serializes_contract_fields() {
    let e = rules();
    let base = e.plan_for(Goal::Endurance, ExperienceLevel::Beginner, 30);
    let r = PlanComposer::default().compose(&prediction(Goal::Endurance, 0.6), &base, &AdjustmentSignal::neutral());
    let v = serde_json::to_value(&r).unwrap();
    for field in ["goal", "confidence", "probabilities", "workout_plan", "diet_plan", "coaching_text"] {
        assert!(v.get(field).is_some(), "missing {field}");
    }
    assert_eq!(v["goal"], "endurance");
    assert!(v.get("coaching_error").is_none());
    assert_eq!(v["meal_plan"], "");
    assert!(v.get("meal_plan_error").is_none());
    assert!(v["provenance"].get("requested_goal").is_none());
    let total: f64 = v["probabilities"].as_object().unwrap().values().map(|x| x.as_f64().unwrap()).sum();
    assert!((total - 1.0).abs() < 1e-6);
}
