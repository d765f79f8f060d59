//! Gemini `generateContent` adapter.

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{read_body, LlmError, TextGenerator, EMPTY_JSON_OBJECT};

pub struct GeminiGenerator {
    client: Client,
    base_url: String,
    default_model: String,
}

impl GeminiGenerator {
    pub fn new(client: Client, base_url: String, default_model: String) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            default_model,
        }
    }
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'a str,
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    /// Flattened shape some gateways return instead of `candidates`.
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

impl GenerateContentResponse {
    /// Concatenated text parts of the first candidate.
    fn candidate_text(&self) -> Option<String> {
        let parts = &self.candidates.first()?.content.as_ref()?.parts;
        let texts: Vec<&str> = parts.iter().filter_map(|p| p.text.as_deref()).collect();
        if texts.is_empty() {
            None
        } else {
            Some(texts.concat())
        }
    }

    fn into_text(self) -> Option<String> {
        self.candidate_text().or(self.text)
    }
}

#[async_trait]
impl TextGenerator for GeminiGenerator {
    fn default_model(&self) -> &str {
        &self.default_model
    }

    async fn generate(
        &self,
        prompt: &str,
        model: &str,
        api_key: &SecretString,
    ) -> Result<String, LlmError> {
        let request_body = GenerateContentRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![RequestPart { text: prompt }],
            }],
        };

        let response = self
            .client
            .post(format!("{}/models/{model}:generateContent", self.base_url))
            .header("x-goog-api-key", api_key.expose_secret())
            .json(&request_body)
            .send()
            .await?;

        let body = read_body(response).await?;
        let parsed: GenerateContentResponse = serde_json::from_str(&body)?;

        let text = parsed
            .into_text()
            .unwrap_or_else(|| EMPTY_JSON_OBJECT.to_string());
        debug!("Gemini call succeeded: model={model}, chars={}", text.len());

        Ok(text)
    }
}
