use fitrec_core::Goal;

/// Narrow capability every goal model exposes to the engine.
///
/// Implementations return one non-negative score per goal, indexed by
/// `Goal::index`. Normalisation into a probability simplex happens in
/// `GoalClassifier`, so a model may return unnormalised scores.
pub trait GoalModel: Send + Sync {
    /// Per-goal scores for one feature vector.
    fn predict_proba(&self, features: &[f64]) -> [f64; Goal::COUNT];

    /// Number of input features the model was fitted on.
    fn n_features(&self) -> usize;

    /// Short model family name for logs.
    fn name(&self) -> &str;
}
