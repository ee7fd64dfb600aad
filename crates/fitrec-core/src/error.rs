use thiserror::Error;

#[derive(Error, Debug)]
pub enum FitError {
    #[error("Invalid {field}: {reason}")]
    Validation { field: &'static str, reason: String },
    #[error("Model unavailable: {0}")]
    ModelUnavailable(String),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl FitError {
    pub fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Validation { field, reason: reason.into() }
    }

    /// True for errors caused by the caller's input rather than the service.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }
}

pub type Result<T> = std::result::Result<T, FitError>;

/// Failure of the external coaching text service.
///
/// Recovered locally by omitting narrative text; never turned into a
/// request failure.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoachingError {
    #[error("coaching service timed out after {after_ms} ms")]
    Timeout { after_ms: u64 },
    #[error("coaching service rate limited the request")]
    RateLimited,
    #[error("coaching service error: {0}")]
    Service(String),
}

impl CoachingError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Timeout { .. } => "timeout",
            Self::RateLimited => "rate_limited",
            Self::Service(_) => "service_error",
        }
    }
}
