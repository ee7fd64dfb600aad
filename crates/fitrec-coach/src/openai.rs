use async_trait::async_trait;
use fitrec_core::config::CoachingConfig;
use fitrec_core::{CoachingError, FitError, Result};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use crate::adapter::CoachingTextAdapter;
use crate::prompt::{clean_reply, meal_plan_prompt, user_prompt, SYSTEM_PROMPT};
use crate::summary::PlanSummary;

/// Client for any OpenAI-compatible chat completions endpoint (Groq by default).
#[derive(Clone)]
pub struct OpenAiCompatibleCoach {
    base_url: String,
    model: String,
    api_key: Option<String>,
    temperature: f64,
    max_tokens: u32,
    timeout: Duration,
    http_client: reqwest::Client,
}

impl OpenAiCompatibleCoach {
    pub fn new(base_url: impl Into<String>, model: impl Into<String>, api_key: Option<String>) -> Result<Self> {
        let defaults = CoachingConfig::default();
        Self::build(
            base_url.into(),
            model.into(),
            api_key,
            defaults.temperature,
            defaults.max_tokens,
            Duration::from_millis(defaults.timeout_ms),
        )
    }

    pub fn from_config(config: &CoachingConfig) -> Result<Self> {
        Self::build(
            config.base_url.clone(),
            config.model.clone(),
            config.api_key.clone(),
            config.temperature,
            config.max_tokens,
            Duration::from_millis(config.timeout_ms),
        )
    }

    fn build(
        base_url: String,
        model: String,
        api_key: Option<String>,
        temperature: f64,
        max_tokens: u32,
        timeout: Duration,
    ) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FitError::Config(format!("coaching http client: {e}")))?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            model,
            api_key,
            temperature,
            max_tokens,
            timeout,
            http_client,
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self> {
        self.http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FitError::Config(format!("coaching http client: {e}")))?;
        self.timeout = timeout;
        Ok(self)
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    fn map_send_error(&self, e: reqwest::Error) -> CoachingError {
        if e.is_timeout() {
            CoachingError::Timeout { after_ms: self.timeout.as_millis() as u64 }
        } else {
            CoachingError::Service(e.to_string())
        }
    }
}

impl std::fmt::Debug for OpenAiCompatibleCoach {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiCompatibleCoach")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("has_api_key", &self.api_key.is_some())
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    temperature: f64,
    max_tokens: u32,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

impl OpenAiCompatibleCoach {
    /// One chat completion with the shared system prompt.
    async fn complete(&self, user: String, task: &str) -> std::result::Result<String, CoachingError> {
        let request = ChatCompletionRequest {
            model: &self.model,
            messages: vec![
                ChatMessage { role: "system".into(), content: SYSTEM_PROMPT.into() },
                ChatMessage { role: "user".into(), content: user },
            ],
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        let mut builder = self.http_client.post(self.endpoint()).json(&request);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder.send().await.map_err(|e| self.map_send_error(e))?;
        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(CoachingError::RateLimited);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CoachingError::Service(format!("HTTP {status}: {body}")));
        }

        let completion: ChatCompletionResponse =
            response.json().await.map_err(|e| self.map_send_error(e))?;
        let content = completion
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .unwrap_or_default();
        let text = clean_reply(&content);
        if text.is_empty() {
            return Err(CoachingError::Service("empty completion".into()));
        }
        debug!(model = %self.model, task, chars = text.len(), "completion received");
        Ok(text)
    }
}

#[async_trait]
impl CoachingTextAdapter for OpenAiCompatibleCoach {
    async fn generate(&self, summary: &PlanSummary) -> std::result::Result<String, CoachingError> {
        self.complete(user_prompt(summary), "coaching").await
    }

    async fn generate_meal_plan(&self, summary: &PlanSummary) -> std::result::Result<String, CoachingError> {
        self.complete(meal_plan_prompt(summary), "meal_plan").await
    }

    fn name(&self) -> &str {
        "openai_compatible"
    }
}
