//! Coaching text adapter: narrative advice from an external LLM service,
//! bounded by a deadline and reported through typed failures.

pub mod adapter;
pub mod openai;
pub mod prompt;
pub mod summary;

pub use adapter::{generate_with_deadline, meal_plan_with_deadline, CoachingTextAdapter, DisabledCoach};
pub use openai::OpenAiCompatibleCoach;
pub use summary::PlanSummary;

use fitrec_core::config::CoachingConfig;
use fitrec_core::Result;
use std::sync::Arc;

/// Adapter for the configuration: the HTTP client when coaching is enabled,
/// otherwise `DisabledCoach`.
pub fn adapter_from_config(config: &CoachingConfig) -> Result<Arc<dyn CoachingTextAdapter>> {
    if config.enabled {
        Ok(Arc::new(OpenAiCompatibleCoach::from_config(config)?))
    } else {
        Ok(Arc::new(DisabledCoach))
    }
}
