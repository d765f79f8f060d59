//! OpenAI-compatible chat-completions adapter.

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{read_body, LlmError, TextGenerator, EMPTY_JSON_OBJECT};

/// Sampling temperature for every content request.
const TEMPERATURE: f64 = 0.7;

pub struct OpenAiGenerator {
    client: Client,
    base_url: String,
    default_model: String,
}

impl OpenAiGenerator {
    pub fn new(client: Client, base_url: String, default_model: String) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            default_model,
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f64,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<ChoiceMessage>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

impl ChatResponse {
    /// First choice's message content, if any.
    fn into_text(self) -> Option<String> {
        self.choices
            .into_iter()
            .next()
            .and_then(|c| c.message)
            .and_then(|m| m.content)
    }
}

#[async_trait]
impl TextGenerator for OpenAiGenerator {
    fn default_model(&self) -> &str {
        &self.default_model
    }

    async fn generate(
        &self,
        prompt: &str,
        model: &str,
        api_key: &SecretString,
    ) -> Result<String, LlmError> {
        let request_body = ChatRequest {
            model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: TEMPERATURE,
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(api_key.expose_secret())
            .json(&request_body)
            .send()
            .await?;

        let body = read_body(response).await?;
        let parsed: ChatResponse = serde_json::from_str(&body)?;

        let text = parsed
            .into_text()
            .unwrap_or_else(|| EMPTY_JSON_OBJECT.to_string());
        debug!("OpenAI call succeeded: model={model}, chars={}", text.len());

        Ok(text)
    }
}
