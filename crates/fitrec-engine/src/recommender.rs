//! The hybrid recommendation pipeline.

use chrono::Utc;
use fitrec_coach::{generate_with_deadline, meal_plan_with_deadline, CoachingTextAdapter, PlanSummary};
use fitrec_core::{encode, FitError, FitRecConfig, Goal, GoalPrediction, Population, Result, UserProfile};
use fitrec_model::GoalClassifier;
use fitrec_rules::{RuleEngine, RuleTables};
use fitrec_similarity::SimilarityMatcher;
use std::time::Duration;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::adjustment::AdjustmentSignal;
use crate::composer::PlanComposer;
use crate::result::{MealPlanResult, RecommendationResult};

/// Process-scoped engine state. Built once at startup and shared read-only
/// across requests.
#[derive(Debug, Clone)]
pub struct Recommender {
    classifier: GoalClassifier,
    rules: RuleEngine,
    population: Population,
    matcher: SimilarityMatcher,
    composer: PlanComposer,
}

impl Recommender {
    pub fn new(
        classifier: GoalClassifier,
        rules: RuleEngine,
        population: Population,
        matcher: SimilarityMatcher,
        composer: PlanComposer,
    ) -> Self {
        Self { classifier, rules, population, matcher, composer }
    }

    /// Load the model artifact, rule tables and population named in the
    /// configuration. Any failure is `ModelUnavailable`.
    pub fn load(config: &FitRecConfig) -> Result<Self> {
        let artifacts = &config.artifacts;
        let classifier = GoalClassifier::from_artifact(&artifacts.model_path)?;

        let tables = match &artifacts.rules_path {
            Some(path) => RuleTables::load(path)?,
            None => RuleTables::builtin()?,
        };

        let population = Population::load(&artifacts.population_path).map_err(|e| {
            FitError::ModelUnavailable(format!("population {}: {e}", artifacts.population_path.display()))
        })?;

        let matcher = SimilarityMatcher::from_config(&config.similarity)?;
        info!(
            model = classifier.model_name(),
            templates = tables.templates().len(),
            population = population.len(),
            k = matcher.k(),
            metric = %matcher.metric(),
            "recommender ready"
        );

        Ok(Self::new(
            classifier,
            RuleEngine::new(tables),
            population,
            matcher,
            PlanComposer::new(config.composer.clone()),
        ))
    }

    pub fn classifier(&self) -> &GoalClassifier {
        &self.classifier
    }

    pub fn rules(&self) -> &RuleEngine {
        &self.rules
    }

    pub fn population(&self) -> &Population {
        &self.population
    }

    pub fn matcher(&self) -> &SimilarityMatcher {
        &self.matcher
    }

    /// Goal prediction only. Fails only on invalid input.
    pub fn predict(&self, profile: &UserProfile) -> Result<GoalPrediction> {
        let vector = encode(profile)?;
        Ok(self.classifier.predict(&vector))
    }

    /// Structured recommendation without coaching text. Fails only on
    /// invalid input.
    pub fn recommend(&self, profile: &UserProfile) -> Result<RecommendationResult> {
        self.recommend_for(profile, None)
    }

    /// Like `recommend`, but a caller-chosen `goal` keys the rule plan
    /// instead of the predicted label. The prediction is still reported.
    pub fn recommend_for(&self, profile: &UserProfile, goal: Option<Goal>) -> Result<RecommendationResult> {
        let vector = encode(profile)?;
        let prediction = self.classifier.predict(&vector);
        let signal = self.matcher.similar_outcomes(&vector, &self.population);

        let plan_goal = goal.unwrap_or(prediction.goal);
        let config = self.composer.config();
        let mut adjustment = AdjustmentSignal::for_goal(plan_goal, prediction.probability(plan_goal), &signal, config);
        if let Some(d) = adjustment.disagreement {
            if d.frequency >= config.similarity_note_threshold {
                if let Some(note) = self.rules.similarity_note(d.goal) {
                    adjustment = adjustment.with_diet_note(note);
                }
            }
        }

        let base = self.rules.plan_for(plan_goal, profile.experience_level, profile.age);
        let mut result = self.composer.compose(&prediction, &base, &adjustment);
        result.bmi = Some(profile.bmi());
        result.bmi_category = Some(profile.bmi_category());
        result.general_tips = self.rules.general_tips(plan_goal);
        if let Some(chosen) = goal {
            result.provenance.requested_goal = Some(chosen);
            if chosen != prediction.goal {
                result.notes.push(format!(
                    "Plan built for the chosen goal {}; predicted goal was {} ({:.0}%)",
                    chosen.display_name(),
                    prediction.goal.display_name(),
                    prediction.confidence * 100.0
                ));
            }
        }

        debug!(
            request_id = %result.request_id,
            goal = %result.goal,
            plan_goal = %plan_goal,
            confidence = result.confidence,
            intensity = result.intensity,
            sessions = result.sessions_per_week,
            "composed recommendation"
        );
        Ok(result)
    }

    /// Recommendation plus coaching text and a meal plan, requested
    /// concurrently. Service failures never fail the request: the text stays
    /// empty and the failure kind is recorded.
    pub async fn recommend_with_coaching(
        &self,
        profile: &UserProfile,
        goal: Option<Goal>,
        coach: &dyn CoachingTextAdapter,
        deadline: Duration,
    ) -> Result<RecommendationResult> {
        let mut result = self.recommend_for(profile, goal)?;
        let summary = summarize(&result, profile);
        let (coaching, meals) = tokio::join!(
            generate_with_deadline(coach, &summary, deadline),
            meal_plan_with_deadline(coach, &summary, deadline),
        );
        match coaching {
            Ok(text) => result.coaching_text = text,
            Err(e) => {
                warn!(
                    request_id = %result.request_id,
                    adapter = coach.name(),
                    kind = e.kind(),
                    error = %e,
                    "coaching text unavailable, returning plan without it"
                );
                result.coaching_error = Some(e.kind().to_string());
            }
        }
        match meals {
            Ok(text) => result.meal_plan = text,
            Err(e) => {
                warn!(
                    request_id = %result.request_id,
                    adapter = coach.name(),
                    kind = e.kind(),
                    error = %e,
                    "meal plan unavailable, returning plan without it"
                );
                result.meal_plan_error = Some(e.kind().to_string());
            }
        }
        Ok(result)
    }

    /// Three-day meal plan for the rule-based diet. Fails only on invalid
    /// input; a service failure leaves the text empty.
    pub async fn meal_plan(
        &self,
        profile: &UserProfile,
        goal: Option<Goal>,
        coach: &dyn CoachingTextAdapter,
        deadline: Duration,
    ) -> Result<MealPlanResult> {
        let plan = self.recommend_for(profile, goal)?;
        let summary = summarize(&plan, profile);
        let mut result = MealPlanResult {
            request_id: Uuid::new_v4(),
            generated_at: Utc::now(),
            goal: plan.goal,
            confidence: plan.confidence,
            plan_goal: plan.provenance.template_goal,
            bmi: profile.bmi(),
            bmi_category: profile.bmi_category(),
            diet_plan: plan.diet_plan,
            meal_plan: String::new(),
            coaching_error: None,
        };
        match meal_plan_with_deadline(coach, &summary, deadline).await {
            Ok(text) => result.meal_plan = text,
            Err(e) => {
                warn!(
                    request_id = %result.request_id,
                    adapter = coach.name(),
                    kind = e.kind(),
                    error = %e,
                    "meal plan unavailable, returning diet guidance only"
                );
                result.coaching_error = Some(e.kind().to_string());
            }
        }
        Ok(result)
    }
}

/// Digest of a composed plan for the coaching service.
pub fn summarize(result: &RecommendationResult, profile: &UserProfile) -> PlanSummary {
    PlanSummary {
        goal: result.provenance.template_goal,
        confidence: result
            .probabilities
            .get(&result.provenance.template_goal)
            .copied()
            .unwrap_or(result.confidence),
        age: profile.age,
        gender: profile.gender,
        weight_kg: profile.weight_kg,
        height_cm: profile.height_cm,
        activity_level: profile.activity_level,
        bmi: profile.bmi(),
        bmi_category: profile.bmi_category(),
        experience: profile.experience_level,
        intensity: result.intensity,
        sessions_per_week: result.sessions_per_week,
        workout_highlights: result
            .workout_plan
            .iter()
            .map(|d| format!("{}: {} ({})", d.day, d.focus, d.exercises.join(", ")))
            .collect(),
        diet_highlights: result
            .diet_plan
            .iter()
            .map(|d| format!("{}: {}", d.meal, d.guidance))
            .collect(),
    }
}
