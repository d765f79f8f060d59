//! LLM Client: the provider adapters behind one "generate text from a prompt" contract.
//!
//! ARCHITECTURAL RULE: No other module may call a provider API directly.
//! Handlers pick an adapter from `ProviderRegistry` by request-time tag.
//!
//! Adapters are stateless per call: the credential and model arrive on every
//! invocation and are never cached.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::Config;

pub mod gemini;
pub mod openai;
pub mod prompts;

/// Returned by adapters when the provider response carries no text.
pub const EMPTY_JSON_OBJECT: &str = "{}";

/// Max characters of a non-JSON error body echoed back to the caller.
const ERROR_BODY_PREVIEW: usize = 200;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

impl LlmError {
    /// Short, caller-safe description. Never contains request headers.
    pub fn user_message(&self) -> String {
        match self {
            LlmError::Http(e) if e.is_timeout() => "provider did not respond in time".to_string(),
            LlmError::Http(_) => "could not reach provider".to_string(),
            LlmError::Api { message, .. } => message.clone(),
            LlmError::Parse(_) => "provider returned an unreadable response".to_string(),
        }
    }
}

/// The capability every provider adapter offers.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Model used when the request leaves `model` blank.
    fn default_model(&self) -> &str;

    /// Performs exactly one provider call and returns its raw text.
    async fn generate(
        &self,
        prompt: &str,
        model: &str,
        api_key: &SecretString,
    ) -> Result<String, LlmError>;
}

/// Closed set of supported providers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    #[default]
    OpenAi,
    Gemini,
}

impl Provider {
    pub const ALL: [Provider; 2] = [Provider::OpenAi, Provider::Gemini];

    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::OpenAi => "openai",
            Provider::Gemini => "gemini",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Provider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "openai" => Ok(Provider::OpenAi),
            "gemini" => Ok(Provider::Gemini),
            other => Err(format!("Unknown provider: {other}")),
        }
    }
}

/// One adapter per `Provider`. Cloned into `AppState`.
#[derive(Clone)]
pub struct ProviderRegistry {
    openai: Arc<dyn TextGenerator>,
    gemini: Arc<dyn TextGenerator>,
}

impl ProviderRegistry {
    pub fn new(openai: Arc<dyn TextGenerator>, gemini: Arc<dyn TextGenerator>) -> Self {
        Self { openai, gemini }
    }

    /// Builds both HTTP adapters over one shared client.
    pub fn from_config(config: &Config) -> Result<Self, LlmError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.provider_timeout_secs))
            .build()?;

        Ok(Self::new(
            Arc::new(openai::OpenAiGenerator::new(
                client.clone(),
                config.openai_base_url.clone(),
                config.openai_default_model.clone(),
            )),
            Arc::new(gemini::GeminiGenerator::new(
                client,
                config.gemini_base_url.clone(),
                config.gemini_default_model.clone(),
            )),
        ))
    }

    pub fn get(&self, provider: Provider) -> &dyn TextGenerator {
        match provider {
            Provider::OpenAi => self.openai.as_ref(),
            Provider::Gemini => self.gemini.as_ref(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// Reads a provider response body, turning non-2xx statuses into `LlmError::Api`.
/// Both providers wrap failures as `{"error": {"message": ...}}`.
pub(crate) async fn read_body(response: reqwest::Response) -> Result<String, LlmError> {
    let status = response.status();
    let body = response.text().await?;

    if status.is_success() {
        return Ok(body);
    }

    let message = serde_json::from_str::<ApiErrorEnvelope>(&body)
        .map(|e| e.error.message)
        .unwrap_or_else(|_| {
            let preview: String = body.chars().take(ERROR_BODY_PREVIEW).collect();
            format!("HTTP {status}: {preview}")
        });

    Err(LlmError::Api {
        status: status.as_u16(),
        message,
    })
}
