//! Persisted model artifact, loaded once at process start.

use chrono::{DateTime, Utc};
use fitrec_core::encoder::FEATURE_NAMES;
use fitrec_core::{FitError, Result, ENCODER_VERSION, FEATURE_DIM};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;
use tracing::info;

use crate::forest::{ForestParams, RandomForest};
use crate::traits::GoalModel;
use crate::training::EvaluationReport;

pub const ARTIFACT_FORMAT: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub format_version: u32,
    pub encoder_version: u32,
    pub feature_names: Vec<String>,
    pub trained_at: DateTime<Utc>,
    pub params: ForestParams,
    pub evaluation: Option<EvaluationReport>,
    pub forest: RandomForest,
}

impl ModelArtifact {
    pub fn new(forest: RandomForest, params: ForestParams, evaluation: Option<EvaluationReport>) -> Self {
        Self {
            format_version: ARTIFACT_FORMAT,
            encoder_version: ENCODER_VERSION,
            feature_names: FEATURE_NAMES.iter().map(|s| s.to_string()).collect(),
            trained_at: Utc::now(),
            params,
            evaluation,
            forest,
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer(writer, self)?;
        info!(path = %path.display(), trees = self.forest.len(), "saved model artifact");
        Ok(())
    }

    /// Load and check compatibility with the running encoder.
    ///
    /// Every failure maps to `FitError::ModelUnavailable`: without a usable
    /// classifier the service has nothing to serve.
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .map_err(|e| FitError::ModelUnavailable(format!("{}: {e}", path.display())))?;
        let artifact: ModelArtifact = serde_json::from_reader(BufReader::new(file))
            .map_err(|e| FitError::ModelUnavailable(format!("{}: {e}", path.display())))?;
        artifact.check()?;
        info!(
            path = %path.display(),
            trees = artifact.forest.len(),
            trained_at = %artifact.trained_at,
            "loaded model artifact"
        );
        Ok(artifact)
    }

    fn check(&self) -> Result<()> {
        if self.format_version != ARTIFACT_FORMAT {
            return Err(FitError::ModelUnavailable(format!(
                "unsupported artifact format {}",
                self.format_version
            )));
        }
        if self.encoder_version != ENCODER_VERSION {
            return Err(FitError::ModelUnavailable(format!(
                "artifact trained with encoder v{}, running encoder is v{ENCODER_VERSION}",
                self.encoder_version
            )));
        }
        if self.forest.is_empty() {
            return Err(FitError::ModelUnavailable("artifact contains no trees".into()));
        }
        if self.forest.n_features() != FEATURE_DIM {
            return Err(FitError::ModelUnavailable(format!(
                "artifact expects {} features, encoder produces {FEATURE_DIM}",
                self.forest.n_features()
            )));
        }
        Ok(())
    }
}
