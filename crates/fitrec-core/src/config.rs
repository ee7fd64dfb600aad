use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::{FitError, Result};

/// Upper bound on `ComposerConfig::max_intensity_swing`.
pub const MAX_INTENSITY_SWING: f64 = 0.5;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FitRecConfig {
    pub server: ServerConfig,
    pub artifacts: ArtifactsConfig,
    pub similarity: SimilarityConfig,
    pub composer: ComposerConfig,
    pub coaching: CoachingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ArtifactsConfig {
    pub model_path: PathBuf,
    pub population_path: PathBuf,
    /// `None` uses the built-in rule tables.
    pub rules_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimilarityConfig {
    pub k: usize,
    pub metric: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ComposerConfig {
    /// Largest relative change similarity may apply to plan intensity,
    /// in [0, `MAX_INTENSITY_SWING`].
    pub max_intensity_swing: f64,
    /// Neighbour share a goal other than the plan's needs before its diet
    /// note is appended.
    pub similarity_note_threshold: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CoachingConfig {
    pub enabled: bool,
    pub base_url: String,
    pub model: String,
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    pub timeout_ms: u64,
    pub temperature: f64,
    pub max_tokens: u32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "0.0.0.0".into(), port: 8000 }
    }
}

impl Default for ArtifactsConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from("artifacts/goal_model.json"),
            population_path: PathBuf::from("artifacts/population.json"),
            rules_path: None,
        }
    }
}

impl Default for SimilarityConfig {
    fn default() -> Self {
        Self { k: 10, metric: "euclidean".into() }
    }
}

impl Default for ComposerConfig {
    fn default() -> Self {
        Self { max_intensity_swing: 0.10, similarity_note_threshold: 0.4 }
    }
}

impl Default for CoachingConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            base_url: "https://api.groq.com/openai/v1".into(),
            model: "llama-3.1-70b-versatile".into(),
            api_key: None,
            timeout_ms: 8_000,
            temperature: 0.7,
            max_tokens: 1500,
        }
    }
}

impl ComposerConfig {
    /// Configured swing limited to [0, `MAX_INTENSITY_SWING`]. Non-finite
    /// values disable the adjustment.
    pub fn intensity_swing(&self) -> f64 {
        let s = self.max_intensity_swing;
        if s.is_finite() {
            s.clamp(0.0, MAX_INTENSITY_SWING)
        } else {
            0.0
        }
    }
}

impl FitRecConfig {
    /// Load from an optional JSON file, then apply environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(p) => {
                let raw = std::fs::read_to_string(p)?;
                debug!(path = %p.display(), "loading config file");
                serde_json::from_str(&raw)?
            }
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        info!(
            bind = %config.bind_addr(),
            k = config.similarity.k,
            metric = %config.similarity.metric,
            coaching = config.coaching.enabled,
            "configuration loaded"
        );
        Ok(config)
    }

    /// Apply `FITREC_*` overrides read through `lookup`.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(v) = lookup("FITREC_HOST") {
            self.server.host = v;
        }
        if let Some(v) = lookup("FITREC_PORT") {
            self.server.port = parse_env("FITREC_PORT", &v)?;
        }
        if let Some(v) = lookup("FITREC_MODEL_PATH") {
            self.artifacts.model_path = PathBuf::from(v);
        }
        if let Some(v) = lookup("FITREC_POPULATION_PATH") {
            self.artifacts.population_path = PathBuf::from(v);
        }
        if let Some(v) = lookup("FITREC_RULES_PATH") {
            self.artifacts.rules_path = Some(PathBuf::from(v));
        }
        if let Some(v) = lookup("FITREC_K") {
            self.similarity.k = parse_env("FITREC_K", &v)?;
        }
        if let Some(v) = lookup("FITREC_COACH_BASE_URL") {
            self.coaching.base_url = v;
        }
        if let Some(v) = lookup("FITREC_COACH_MODEL") {
            self.coaching.model = v;
        }
        if let Some(v) = lookup("FITREC_COACH_TIMEOUT_MS") {
            self.coaching.timeout_ms = parse_env("FITREC_COACH_TIMEOUT_MS", &v)?;
        }
        if let Some(key) = lookup("FITREC_COACH_API_KEY").or_else(|| lookup("GROQ_API_KEY")) {
            if !key.trim().is_empty() {
                self.coaching.api_key = Some(key);
            }
        }
        self.coaching.enabled = self.coaching.api_key.is_some();
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.similarity.k == 0 {
            return Err(FitError::Config("similarity.k must be at least 1".into()));
        }
        if self.coaching.timeout_ms == 0 {
            return Err(FitError::Config("coaching.timeout_ms must be positive".into()));
        }
        if !(0.0..=MAX_INTENSITY_SWING).contains(&self.composer.max_intensity_swing) {
            return Err(FitError::Config(format!(
                "composer.max_intensity_swing must be in [0, {MAX_INTENSITY_SWING}]"
            )));
        }
        Ok(())
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| FitError::Config(format!("{key}: cannot parse '{value}'")))
}
