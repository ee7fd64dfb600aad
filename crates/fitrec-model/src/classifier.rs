use fitrec_core::{FeatureVector, FitError, GoalPrediction, Result, ENCODER_VERSION};
use std::path::Path;
use std::sync::Arc;
use tracing::warn;

use crate::artifact::ModelArtifact;
use crate::traits::GoalModel;

/// Process-wide goal classifier. Cheap to clone; read-only after construction.
#[derive(Clone)]
pub struct GoalClassifier {
    model: Arc<dyn GoalModel>,
}

impl GoalClassifier {
    pub fn new(model: Arc<dyn GoalModel>) -> Self {
        Self { model }
    }

    /// Load the persisted artifact. Fails with `ModelUnavailable`.
    pub fn from_artifact(path: &Path) -> Result<Self> {
        let artifact = ModelArtifact::load(path)?;
        Ok(Self::new(Arc::new(artifact.forest)))
    }

    /// Full probability simplex plus the top label.
    ///
    /// A vector from another encoder version cannot be scored meaningfully
    /// and yields the uniform distribution.
    pub fn predict(&self, vector: &FeatureVector) -> GoalPrediction {
        if vector.version != ENCODER_VERSION || vector.dim() != self.model.n_features() {
            warn!(
                version = vector.version,
                dim = vector.dim(),
                expected_dim = self.model.n_features(),
                "feature vector incompatible with classifier"
            );
            return GoalPrediction::from_scores([0.0; fitrec_core::Goal::COUNT]);
        }
        GoalPrediction::from_scores(self.model.predict_proba(vector.as_slice()))
    }

    pub fn model_name(&self) -> &str {
        self.model.name()
    }
}

impl std::fmt::Debug for GoalClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoalClassifier").field("model", &self.model.name()).finish()
    }
}

impl TryFrom<ModelArtifact> for GoalClassifier {
    type Error = FitError;

    fn try_from(artifact: ModelArtifact) -> Result<Self> {
        if artifact.forest.is_empty() {
            return Err(FitError::ModelUnavailable("artifact contains no trees".into()));
        }
        Ok(Self::new(Arc::new(artifact.forest)))
    }
}
