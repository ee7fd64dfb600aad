//! Hybrid recommendation engine: classifier prediction, rule-based plan,
//! similarity adjustment and plan composition.

pub mod adjustment;
pub mod composer;
pub mod recommender;
pub mod result;

pub use adjustment::{AdjustmentSignal, Disagreement};
pub use composer::PlanComposer;
pub use recommender::{summarize, Recommender};
pub use result::{DietItem, MealPlanResult, PlanSource, Provenance, RecommendationResult, WorkoutDay};

#[cfg(test)]
mod tests;
