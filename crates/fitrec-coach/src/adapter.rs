use async_trait::async_trait;
use fitrec_core::CoachingError;
use std::future::Future;
use std::time::Duration;
use tracing::debug;

use crate::summary::PlanSummary;

/// Narrative text generation for a composed plan.
#[async_trait]
pub trait CoachingTextAdapter: Send + Sync {
    async fn generate(&self, summary: &PlanSummary) -> Result<String, CoachingError>;

    /// Three-day meal plan for the user and diet in `summary`.
    async fn generate_meal_plan(&self, summary: &PlanSummary) -> Result<String, CoachingError>;

    fn name(&self) -> &str;
}

/// Adapter used when no coaching service is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledCoach;

#[async_trait]
impl CoachingTextAdapter for DisabledCoach {
    async fn generate(&self, _summary: &PlanSummary) -> Result<String, CoachingError> {
        Err(CoachingError::Service("coaching is not configured".into()))
    }

    async fn generate_meal_plan(&self, _summary: &PlanSummary) -> Result<String, CoachingError> {
        Err(CoachingError::Service("coaching is not configured".into()))
    }

    fn name(&self) -> &str {
        "disabled"
    }
}

/// Run the adapter's coaching text under a caller-supplied deadline.
pub async fn generate_with_deadline(
    adapter: &dyn CoachingTextAdapter,
    summary: &PlanSummary,
    deadline: Duration,
) -> Result<String, CoachingError> {
    run_with_deadline(adapter.name(), "coaching", deadline, adapter.generate(summary)).await
}

/// Run the adapter's meal plan under a caller-supplied deadline.
pub async fn meal_plan_with_deadline(
    adapter: &dyn CoachingTextAdapter,
    summary: &PlanSummary,
    deadline: Duration,
) -> Result<String, CoachingError> {
    run_with_deadline(adapter.name(), "meal_plan", deadline, adapter.generate_meal_plan(summary)).await
}

async fn run_with_deadline<F>(adapter: &str, task: &str, deadline: Duration, fut: F) -> Result<String, CoachingError>
where
    F: Future<Output = Result<String, CoachingError>>,
{
    match tokio::time::timeout(deadline, fut).await {
        Ok(result) => result,
        Err(_) => {
            let after_ms = deadline.as_millis() as u64;
            debug!(adapter, task, deadline_ms = after_ms, "coaching deadline hit");
            Err(CoachingError::Timeout { after_ms })
        }
    }
}
