//! Goal classifier: a bagged decision-tree ensemble behind the narrow
//! `GoalModel` capability, plus the offline synthetic-data trainer.

pub mod artifact;
pub mod classifier;
pub mod forest;
pub mod synthetic;
pub mod traits;
pub mod training;
pub mod tree;

pub use artifact::ModelArtifact;
pub use classifier::GoalClassifier;
pub use forest::{ForestParams, RandomForest};
pub use traits::GoalModel;
pub use training::{train, EvaluationReport, TrainingOutcome};
pub use tree::{DecisionTree, Sample, TreeParams};

#[cfg(test)]
mod tests;
