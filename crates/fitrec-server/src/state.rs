//! Application state shared across all handlers.

use fitrec_coach::{CoachingTextAdapter, DisabledCoach};
use fitrec_engine::Recommender;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Shared, read-only application state.
#[derive(Clone)]
pub struct AppState {
    pub recommender: Arc<Recommender>,
    pub coach: Arc<dyn CoachingTextAdapter>,
    pub coaching_deadline: Duration,
    pub start_time: Instant,
}

impl AppState {
    pub fn new(recommender: Recommender, coach: Arc<dyn CoachingTextAdapter>, coaching_deadline: Duration) -> Self {
        Self {
            recommender: Arc::new(recommender),
            coach,
            coaching_deadline,
            start_time: Instant::now(),
        }
    }

    /// State without a coaching service.
    pub fn without_coaching(recommender: Recommender) -> Self {
        Self::new(recommender, Arc::new(DisabledCoach), Duration::from_secs(1))
    }
}
