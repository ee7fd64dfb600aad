use axum::{
    extract::{rejection::JsonRejection, State},
    routing::{get, post},
    Json, Router,
};
use fitrec_core::{BmiCategory, Goal, UserProfile};
use fitrec_engine::{MealPlanResult, RecommendationResult};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::BTreeMap;

use crate::error::ApiError;
use crate::state::AppState;

pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
}

pub fn recommendation_routes() -> Router<AppState> {
    Router::new()
        .route("/api/v1/predict", post(predict))
        .route("/api/v1/recommend", post(recommend))
        .route("/api/v1/full_plan", post(full_plan))
        .route("/api/v1/meal_plan", post(meal_plan))
}

async fn root() -> Json<Value> {
    Json(json!({
        "service": "fitrec",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "health": "GET /health",
            "predict": "POST /api/v1/predict",
            "recommend": "POST /api/v1/recommend",
            "full_plan": "POST /api/v1/full_plan",
            "meal_plan": "POST /api/v1/meal_plan",
        }
    }))
}

async fn health(State(state): State<AppState>) -> Json<Value> {
    let r = &state.recommender;
    Json(json!({
        "status": "ok",
        "uptime_secs": state.start_time.elapsed().as_secs(),
        "model": r.classifier().model_name(),
        "population": r.population().len(),
        "similarity_k": r.matcher().k(),
        "coaching": state.coach.name(),
    }))
}

/// Profile plus an optional goal the caller wants the plan built for.
#[derive(Debug, Deserialize)]
pub struct RecommendRequest {
    #[serde(flatten)]
    pub profile: UserProfile,
    #[serde(default, alias = "fitness_goal")]
    pub goal: Option<Goal>,
}

#[derive(Debug, Serialize)]
pub struct PredictResponse {
    pub goal: Goal,
    pub confidence: f64,
    pub probabilities: BTreeMap<Goal, f64>,
    pub bmi: f64,
    pub bmi_category: BmiCategory,
}

async fn predict(
    State(state): State<AppState>,
    payload: Result<Json<UserProfile>, JsonRejection>,
) -> Result<Json<PredictResponse>, ApiError> {
    let Json(profile) = payload?;
    let prediction = state.recommender.predict(&profile)?;
    Ok(Json(PredictResponse {
        goal: prediction.goal,
        confidence: prediction.confidence,
        probabilities: prediction.probabilities,
        bmi: profile.bmi(),
        bmi_category: profile.bmi_category(),
    }))
}

async fn recommend(
    State(state): State<AppState>,
    payload: Result<Json<RecommendRequest>, JsonRejection>,
) -> Result<Json<RecommendationResult>, ApiError> {
    let Json(req) = payload?;
    Ok(Json(state.recommender.recommend_for(&req.profile, req.goal)?))
}

async fn full_plan(
    State(state): State<AppState>,
    payload: Result<Json<RecommendRequest>, JsonRejection>,
) -> Result<Json<RecommendationResult>, ApiError> {
    let Json(req) = payload?;
    let result = state
        .recommender
        .recommend_with_coaching(&req.profile, req.goal, state.coach.as_ref(), state.coaching_deadline)
        .await?;
    Ok(Json(result))
}

async fn meal_plan(
    State(state): State<AppState>,
    payload: Result<Json<RecommendRequest>, JsonRejection>,
) -> Result<Json<MealPlanResult>, ApiError> {
    let Json(req) = payload?;
    let result = state
        .recommender
        .meal_plan(&req.profile, req.goal, state.coach.as_ref(), state.coaching_deadline)
        .await?;
    Ok(Json(result))
}
