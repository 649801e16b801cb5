pub mod chat;

use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("provider request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("provider returned {status}: {body}")]
    Status {
        status: u16,
        body: String,
    },
    #[error("failed to decode provider response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("provider returned no choices")]
    EmptyResponse,
    #[error("provider call timed out after {0:?}")]
    Timeout(Duration),
    #[error("invalid provider configuration: {0}")]
    InvalidConfig(String),
}

/// Connection settings for one model configuration.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl LlmConfig {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: model.into(),
            ..Self::default()
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeouts(mut self, connect: Duration, request: Duration) -> Self {
        self.connect_timeout = connect;
        self.request_timeout = request;
        self
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: "gpt-4o".to_string(),
            connect_timeout: Duration::from_secs(15),
            request_timeout: Duration::from_secs(180),
        }
    }
}

/// Runs a provider call under the configured deadline so a hung upstream
/// surfaces as `LlmError::Timeout` instead of blocking the request.
pub async fn with_deadline<T, F>(deadline: Duration, call: F) -> Result<T, LlmError>
    where F: std::future::Future<Output = Result<T, LlmError>>
{
    match tokio::time::timeout(deadline, call).await {
        Ok(result) => result,
        Err(_) => Err(LlmError::Timeout(deadline)),
    }
}
