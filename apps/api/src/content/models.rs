//! Request, prompt-context and response types for SEO content generation.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use crate::content::scoring::SeoScore;

pub const DEFAULT_TONE: &str = "clear, helpful";
pub const DEFAULT_CTA: &str = "Contact us";

/// Request body for POST /api/v1/generate.
///
/// Every field is optional on the wire, and `null` reads as empty, so that a
/// missing credential or an unknown provider tag reaches the handler and gets
/// a precise 400.
#[derive(Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GenerationRequest {
    /// Provider tag. Blank means the default provider.
    #[serde(deserialize_with = "null_as_empty")]
    pub provider: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub api_key: String,
    /// Blank means the adapter's default model.
    #[serde(deserialize_with = "null_as_empty")]
    pub model: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub business_name: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub service: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub city: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub target_audience: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub primary_keyword: String,
    /// Comma-delimited.
    #[serde(deserialize_with = "null_as_empty")]
    pub secondary_keywords: String,
    pub tone: Option<String>,
    pub cta: Option<String>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl fmt::Debug for GenerationRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GenerationRequest")
            .field("provider", &self.provider)
            .field("api_key", &"[REDACTED]")
            .field("model", &self.model)
            .field("business_name", &self.business_name)
            .field("service", &self.service)
            .field("city", &self.city)
            .field("target_audience", &self.target_audience)
            .field("primary_keyword", &self.primary_keyword)
            .field("secondary_keywords", &self.secondary_keywords)
            .field("tone", &self.tone)
            .field("cta", &self.cta)
            .finish()
    }
}

/// Normalized view of a request, fed to the prompt builder.
#[derive(Debug, Clone, PartialEq)]
pub struct PromptContext {
    pub business_name: String,
    pub service: String,
    pub city: String,
    pub target_audience: String,
    pub primary_keyword: String,
    pub secondary_keywords: Vec<String>,
    pub tone: String,
    pub cta: String,
}

impl PromptContext {
    pub fn from_request(request: &GenerationRequest) -> Self {
        Self {
            business_name: request.business_name.clone(),
            service: request.service.clone(),
            city: request.city.clone(),
            target_audience: request.target_audience.clone(),
            primary_keyword: request.primary_keyword.clone(),
            secondary_keywords: split_keywords(&request.secondary_keywords),
            tone: non_blank_or(request.tone.as_deref(), DEFAULT_TONE),
            cta: non_blank_or(request.cta.as_deref(), DEFAULT_CTA),
        }
    }
}

/// Splits on commas, trims, drops empties. Order kept, duplicates kept.
pub fn split_keywords(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(str::to_string)
        .collect()
}

fn non_blank_or(value: Option<&str>, default: &str) -> String {
    match value {
        Some(v) if !v.trim().is_empty() => v.to_string(),
        _ => default.to_string(),
    }
}

/// The four fields the model must return. `schema_json_ld` is always a string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedContent {
    pub meta_title: String,
    pub meta_description: String,
    pub html: String,
    pub schema_json_ld: String,
}

/// Success payload: the generated fields plus the derived score.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationResponse {
    #[serde(flatten)]
    pub content: GeneratedContent,
    pub seo_score: SeoScore,
}
