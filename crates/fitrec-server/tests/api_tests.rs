use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use fitrec_coach::{CoachingTextAdapter, PlanSummary};
use fitrec_core::CoachingError;
use fitrec_engine::{PlanComposer, Recommender};
use fitrec_model::synthetic::generate;
use fitrec_model::{train, ForestParams, GoalClassifier, TrainingOutcome};
use fitrec_rules::{RuleEngine, RuleTables};
use fitrec_server::{app_with_state, state::AppState};
use fitrec_similarity::SimilarityMatcher;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::sync::{Arc, OnceLock};
use std::time::Duration;
use tower::ServiceExt;

fn trained() -> &'static TrainingOutcome {
    static OUTCOME: OnceLock<TrainingOutcome> = OnceLock::new();
    OUTCOME.get_or_init(|| {
        let params = ForestParams { n_estimators: 30, ..ForestParams::default() };
        train(&generate(1000, 42), &params).unwrap()
    })
}

fn recommender() -> Recommender {
    let outcome = trained();
    Recommender::new(
        GoalClassifier::new(Arc::new(outcome.forest.clone())),
        RuleEngine::new(RuleTables::builtin().unwrap()),
        outcome.population.clone(),
        SimilarityMatcher::default(),
        PlanComposer::default(),
    )
}

struct SlowCoach;

#[async_trait]
impl CoachingTextAdapter for SlowCoach {
    async fn generate(&self, _summary: &PlanSummary) -> Result<String, CoachingError> {
        tokio::time::sleep(Duration::from_secs(10)).await;
        Ok("late".into())
    }

    async fn generate_meal_plan(&self, _summary: &PlanSummary) -> Result<String, CoachingError> {
        tokio::time::sleep(Duration::from_secs(10)).await;
        Ok("late".into())
    }

    fn name(&self) -> &str {
        "slow"
    }
}

struct QuickCoach;

#[async_trait]
impl CoachingTextAdapter for QuickCoach {
    async fn generate(&self, summary: &PlanSummary) -> Result<String, CoachingError> {
        Ok(format!("Stick with {}.", summary.goal.display_name()))
    }

    async fn generate_meal_plan(&self, summary: &PlanSummary) -> Result<String, CoachingError> {
        Ok(format!("Day 1: oats. Goal {}.", summary.goal.display_name()))
    }

    fn name(&self) -> &str {
        "quick"
    }
}

fn app() -> axum::Router {
    app_with_state(AppState::without_coaching(recommender()))
}

fn obese_beginner() -> Value {
    json!({
        "age": 25,
        "weight_kg": 90.0,
        "height_cm": 170.0,
        "gender": "male",
        "activity_level": "sedentary",
        "experience_level": "beginner"
    })
}

async fn send(app: axum::Router, req: Request<Body>) -> (StatusCode, Value) {
    let resp = app.oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap() };
    (status, body)
}

fn post(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

// ========== Service Info ==========

#[tokio::test]
async fn test_root_lists_endpoints() {
    let (status, body) = send(app(), get("/")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["service"], "fitrec");
    assert_eq!(body["endpoints"]["full_plan"], "POST /api/v1/full_plan");
    assert_eq!(body["endpoints"]["meal_plan"], "POST /api/v1/meal_plan");
}

#[tokio::test]
async fn test_health() {
    let (status, body) = send(app(), get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["model"], "random_forest");
    assert_eq!(body["population"], 1000);
    assert_eq!(body["coaching"], "disabled");
}

// ========== Predict ==========

#[tokio::test]
async fn test_predict() {
    let (status, body) = send(app(), post("/api/v1/predict", &obese_beginner())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["goal"], "weight_loss");
    assert_eq!(body["bmi_category"], "obese");
    let sum: f64 = body["probabilities"].as_object().unwrap().values().map(|v| v.as_f64().unwrap()).sum();
    assert!((sum - 1.0).abs() < 1e-6);
}

#[tokio::test]
async fn test_predict_accepts_legacy_field_names() {
    let body = json!({
        "age": 25,
        "weight": 90.0,
        "height": 170.0,
        "gender": "Male",
        "activity_level": "Sedentary"
    });
    let (status, body) = send(app(), post("/api/v1/predict", &body)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["goal"], "weight_loss");
}

#[tokio::test]
async fn test_out_of_domain_profile_is_bad_request() {
    let mut body = obese_beginner();
    body["age"] = json!(5);
    let (status, body) = send(app(), post("/api/v1/predict", &body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "bad_request");
    assert!(body["error"]["message"].as_str().unwrap().contains("age"));
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let req = Request::builder()
        .method("POST")
        .uri("/api/v1/recommend")
        .header("content-type", "application/json")
        .body(Body::from("{ \"age\": "))
        .unwrap();
    let (status, body) = send(app(), req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "bad_request");
}

#[tokio::test]
async fn test_unknown_enum_is_bad_request() {
    let mut body = obese_beginner();
    body["activity_level"] = json!("couch");
    let (status, _) = send(app(), post("/api/v1/recommend", &body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// ========== Recommend ==========

#[tokio::test]
async fn test_recommend_contract() {
    let (status, body) = send(app(), post("/api/v1/recommend", &obese_beginner())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["goal"], "weight_loss");
    assert!(body["confidence"].as_f64().unwrap() > 0.5);
    assert!(!body["workout_plan"].as_array().unwrap().is_empty());
    assert!(!body["diet_plan"].as_array().unwrap().is_empty());
    assert_eq!(body["coaching_text"], "");
    assert_eq!(body["provenance"]["template_experience"], "beginner");
    assert!(body["request_id"].is_string());
    assert!(body["general_tips"].as_array().unwrap().len() >= 7);
}

#[tokio::test]
async fn test_recommend_with_chosen_goal() {
    let (_, predicted) = send(app(), post("/api/v1/recommend", &obese_beginner())).await;
    let mut body = obese_beginner();
    body["goal"] = json!("endurance");
    let (status, body) = send(app(), post("/api/v1/recommend", &body)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["goal"], "weight_loss");
    assert_eq!(body["confidence"], predicted["confidence"]);
    assert_eq!(body["provenance"]["template_goal"], "endurance");
    assert_eq!(body["provenance"]["requested_goal"], "endurance");
}

#[tokio::test]
async fn test_recommend_accepts_fitness_goal_name() {
    let mut body = obese_beginner();
    body["fitness_goal"] = json!("Muscle Gain");
    let (status, body) = send(app(), post("/api/v1/recommend", &body)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["provenance"]["template_goal"], "muscle_gain");
}

#[tokio::test]
async fn test_recommend_unknown_goal_is_bad_request() {
    let mut body = obese_beginner();
    body["goal"] = json!("flexibility");
    let (status, body) = send(app(), post("/api/v1/recommend", &body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "bad_request");
}

#[tokio::test]
async fn test_recommend_reports_similar_user_goals() {
    let (status, body) = send(app(), post("/api/v1/recommend", &obese_beginner())).await;
    assert_eq!(status, StatusCode::OK);
    let dist = body["provenance"]["goal_distribution"].as_object().unwrap();
    assert_eq!(dist.len(), 4);
    let total: f64 = dist.values().map(|v| v.as_f64().unwrap()).sum();
    assert!((total - 1.0).abs() < 1e-9);
}

// ========== Full Plan ==========

#[tokio::test]
async fn test_full_plan_with_coaching() {
    let state = AppState::new(recommender(), Arc::new(QuickCoach), Duration::from_secs(1));
    let (status, body) = send(app_with_state(state), post("/api/v1/full_plan", &obese_beginner())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["coaching_text"], "Stick with Weight Loss.");
    assert!(body.get("coaching_error").is_none());
    assert_eq!(body["meal_plan"], "Day 1: oats. Goal Weight Loss.");
    assert!(body.get("meal_plan_error").is_none());
}

#[tokio::test]
async fn test_full_plan_coaching_timeout_still_ok() {
    let state = AppState::new(recommender(), Arc::new(SlowCoach), Duration::from_millis(50));
    let (status, body) = send(app_with_state(state), post("/api/v1/full_plan", &obese_beginner())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["coaching_text"], "");
    assert_eq!(body["coaching_error"], "timeout");
    assert_eq!(body["meal_plan"], "");
    assert_eq!(body["meal_plan_error"], "timeout");
    assert_eq!(body["goal"], "weight_loss");
    assert!(!body["workout_plan"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_full_plan_without_coaching_service() {
    let (status, body) = send(app(), post("/api/v1/full_plan", &obese_beginner())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["coaching_text"], "");
    assert_eq!(body["coaching_error"], "service_error");
}

// ========== Meal Plan ==========

#[tokio::test]
async fn test_meal_plan() {
    let state = AppState::new(recommender(), Arc::new(QuickCoach), Duration::from_secs(1));
    let (status, body) = send(app_with_state(state), post("/api/v1/meal_plan", &obese_beginner())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["goal"], "weight_loss");
    assert_eq!(body["plan_goal"], "weight_loss");
    assert_eq!(body["meal_plan"], "Day 1: oats. Goal Weight Loss.");
    assert!(body.get("coaching_error").is_none());
    assert!(!body["diet_plan"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_meal_plan_for_chosen_goal() {
    let state = AppState::new(recommender(), Arc::new(QuickCoach), Duration::from_secs(1));
    let mut body = obese_beginner();
    body["goal"] = json!("endurance");
    let (status, body) = send(app_with_state(state), post("/api/v1/meal_plan", &body)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["goal"], "weight_loss");
    assert_eq!(body["plan_goal"], "endurance");
    assert_eq!(body["meal_plan"], "Day 1: oats. Goal Endurance.");
}

#[tokio::test]
async fn test_meal_plan_timeout_still_ok() {
    let state = AppState::new(recommender(), Arc::new(SlowCoach), Duration::from_millis(50));
    let (status, body) = send(app_with_state(state), post("/api/v1/meal_plan", &obese_beginner())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["meal_plan"], "");
    assert_eq!(body["coaching_error"], "timeout");
    assert!(!body["diet_plan"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_meal_plan_without_coaching_service() {
    let (status, body) = send(app(), post("/api/v1/meal_plan", &obese_beginner())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["meal_plan"], "");
    assert_eq!(body["coaching_error"], "service_error");
}

#[tokio::test]
async fn test_meal_plan_invalid_profile_is_bad_request() {
    let mut body = obese_beginner();
    body["height_cm"] = json!(-3.0);
    let (status, _) = send(app(), post("/api/v1/meal_plan", &body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unknown_route() {
    let (status, _) = send(app(), get("/api/v1/nope")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
