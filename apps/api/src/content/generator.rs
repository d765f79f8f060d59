//! Content generation: orchestrates one request end to end.
//!
//! Flow: credential check → provider tag → prompt → adapter call →
//!       lenient JSON parse → field validation → schema normalization → score.
//!
//! One provider call per request. No retries, no caching, nothing persisted.

use secrecy::SecretString;
use serde_json::{Map, Value};
use tracing::{debug, info, info_span, Instrument};
use uuid::Uuid;

use crate::content::json_recovery::parse_lenient;
use crate::content::models::{
    GeneratedContent, GenerationRequest, GenerationResponse, PromptContext,
};
use crate::content::prompts::build_content_prompt;
use crate::content::scoring::{score, synthesized_h1};
use crate::errors::AppError;
use crate::llm_client::{Provider, ProviderRegistry};

pub const INVALID_FIELDS_MESSAGE: &str = "model did not return valid JSON fields";

/// Runs the generation pipeline against the adapter selected by `request.provider`.
pub async fn generate_content(
    providers: &ProviderRegistry,
    request: GenerationRequest,
) -> Result<GenerationResponse, AppError> {
    // Step 1: Credential
    if request.api_key.trim().is_empty() {
        return Err(AppError::Validation("Missing API key".to_string()));
    }

    // Step 2: Provider tag (blank selects the default)
    let provider = if request.provider.trim().is_empty() {
        Provider::default()
    } else {
        request
            .provider
            .parse::<Provider>()
            .map_err(AppError::Validation)?
    };

    let request_id = Uuid::new_v4();
    let span = info_span!("generate", %request_id, %provider);

    async move {
        // Step 3: Normalize + prompt
        let ctx = PromptContext::from_request(&request);
        let prompt = build_content_prompt(&ctx);

        // Step 4: Dispatch
        let generator = providers.get(provider);
        let model = match request.model.trim() {
            "" => generator.default_model(),
            m => m,
        };
        info!(
            "Generating content with {provider} model {model} ({} secondary keywords)",
            ctx.secondary_keywords.len()
        );

        let api_key = SecretString::from(request.api_key.clone());
        let raw_text = generator.generate(&prompt, model, &api_key).await?;
        debug!("Provider returned {} chars", raw_text.len());

        // Steps 5–7: Parse, validate, normalize
        let content = parse_generated_content(&raw_text)?;

        // Step 8: Score against the request's own service/city
        let h1 = synthesized_h1(&request.service, &request.city);
        let seo_score = score(&content.meta_title, &content.meta_description, &h1);
        info!(
            "Content generated: title={} desc={} checks={:?}",
            seo_score.title_length, seo_score.description_length, seo_score.checks
        );

        Ok::<_, AppError>(GenerationResponse { content, seo_score })
    }
    .instrument(span)
    .await
}

/// Parses provider text into the four required fields.
///
/// An unrecoverable parse is reported the same way as missing fields, with an
/// empty object as `raw`.
pub fn parse_generated_content(raw_text: &str) -> Result<GeneratedContent, AppError> {
    let parsed = parse_lenient(raw_text).map_err(|e| {
        debug!("JSON recovery failed: {e}");
        AppError::UpstreamContent {
            message: INVALID_FIELDS_MESSAGE.to_string(),
            raw: Value::Object(Map::new()),
        }
    })?;

    extract_content(parsed)
}

fn extract_content(parsed: Value) -> Result<GeneratedContent, AppError> {
    let fields = (
        non_empty_str(&parsed, "metaTitle"),
        non_empty_str(&parsed, "metaDescription"),
        non_empty_str(&parsed, "html"),
        parsed.get("schemaJsonLd").and_then(normalize_schema),
    );

    match fields {
        (Some(meta_title), Some(meta_description), Some(html), Some(schema_json_ld)) => {
            Ok(GeneratedContent {
                meta_title,
                meta_description,
                html,
                schema_json_ld,
            })
        }
        _ => Err(AppError::UpstreamContent {
            message: INVALID_FIELDS_MESSAGE.to_string(),
            raw: parsed,
        }),
    }
}

fn non_empty_str(parsed: &Value, key: &str) -> Option<String> {
    parsed
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Strings pass through; structured values are pretty-printed.
/// `null`, `false`, `0` and `""` count as absent.
fn normalize_schema(value: &Value) -> Option<String> {
    match value {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        other => serde_json::to_string_pretty(other).ok(),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use secrecy::ExposeSecret;
    use serde_json::json;

    use super::*;
    use crate::llm_client::{LlmError, TextGenerator};

    /// Counts calls and replays a canned reply.
    struct MockGenerator {
        reply: Result<String, u16>,
        default_model: &'static str,
        calls: AtomicUsize,
        last_call: Mutex<Option<(String, String, String)>>,
    }

    impl MockGenerator {
        fn replying(text: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: Ok(text.to_string()),
                default_model: "mock-default",
                calls: AtomicUsize::new(0),
                last_call: Mutex::new(None),
            })
        }

        fn failing(status: u16) -> Arc<Self> {
            Arc::new(Self {
                reply: Err(status),
                default_model: "mock-default",
                calls: AtomicUsize::new(0),
                last_call: Mutex::new(None),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl TextGenerator for MockGenerator {
        fn default_model(&self) -> &str {
            self.default_model
        }

        async fn generate(
            &self,
            prompt: &str,
            model: &str,
            api_key: &SecretString,
        ) -> Result<String, LlmError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_call.lock().unwrap() = Some((
                prompt.to_string(),
                model.to_string(),
                api_key.expose_secret().to_string(),
            ));
            match &self.reply {
                Ok(text) => Ok(text.clone()),
                Err(status) => Err(LlmError::Api {
                    status: *status,
                    message: "rate limited".to_string(),
                }),
            }
        }
    }

    fn valid_reply() -> String {
        json!({
            "metaTitle": "a".repeat(55),
            "metaDescription": "b".repeat(150),
            "html": "<h1>Repair in Metro</h1><h2>Why us</h2>",
            "schemaJsonLd": "{\"@type\":\"FAQPage\"}"
        })
        .to_string()
    }

    fn registry(openai: Arc<MockGenerator>, gemini: Arc<MockGenerator>) -> ProviderRegistry {
        ProviderRegistry::new(openai, gemini)
    }

    fn request() -> GenerationRequest {
        GenerationRequest {
            provider: "openai".to_string(),
            api_key: "k".to_string(),
            model: String::new(),
            business_name: "Acme".to_string(),
            service: "Repair".to_string(),
            city: "Metro".to_string(),
            primary_keyword: "repair metro".to_string(),
            secondary_keywords: "fast,cheap".to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_end_to_end_success() {
        let openai = MockGenerator::replying(&valid_reply());
        let gemini = MockGenerator::replying(&valid_reply());
        let providers = registry(openai.clone(), gemini.clone());

        let response = generate_content(&providers, request()).await.unwrap();

        assert_eq!(response.content.meta_title.len(), 55);
        assert_eq!(response.content.meta_description.len(), 150);
        assert!(response.content.html.starts_with("<h1>"));
        assert_eq!(response.content.schema_json_ld, "{\"@type\":\"FAQPage\"}");
        assert_eq!(response.seo_score.title_length, 55);
        assert_eq!(response.seo_score.description_length, 150);
        assert!(response.seo_score.checks.title_ok);
        assert!(response.seo_score.checks.desc_ok);
        assert!(response.seo_score.checks.h1_ok);
        assert_eq!(openai.calls(), 1);
        assert_eq!(gemini.calls(), 0);
    }

    #[tokio::test]
    async fn test_missing_credential_never_calls_adapter() {
        let openai = MockGenerator::replying(&valid_reply());
        let gemini = MockGenerator::replying(&valid_reply());
        let providers = registry(openai.clone(), gemini.clone());

        for key in ["", "   "] {
            let mut req = request();
            req.api_key = key.to_string();
            let err = generate_content(&providers, req).await.unwrap_err();
            assert!(matches!(err, AppError::Validation(ref m) if m == "Missing API key"));
        }
        assert_eq!(openai.calls(), 0);
        assert_eq!(gemini.calls(), 0);
    }

    #[tokio::test]
    async fn test_missing_credential_checked_before_provider_tag() {
        let providers = registry(
            MockGenerator::replying(&valid_reply()),
            MockGenerator::replying(&valid_reply()),
        );
        let mut req = request();
        req.api_key = String::new();
        req.provider = "mystery".to_string();

        let err = generate_content(&providers, req).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(ref m) if m == "Missing API key"));
    }

    #[tokio::test]
    async fn test_unknown_provider_never_calls_adapter() {
        let openai = MockGenerator::replying(&valid_reply());
        let gemini = MockGenerator::replying(&valid_reply());
        let providers = registry(openai.clone(), gemini.clone());

        let mut req = request();
        req.provider = "mystery".to_string();
        let err = generate_content(&providers, req).await.unwrap_err();

        assert!(matches!(err, AppError::Validation(ref m) if m == "Unknown provider: mystery"));
        assert_eq!(openai.calls(), 0);
        assert_eq!(gemini.calls(), 0);
    }

    #[tokio::test]
    async fn test_blank_provider_defaults_to_openai() {
        let openai = MockGenerator::replying(&valid_reply());
        let gemini = MockGenerator::replying(&valid_reply());
        let providers = registry(openai.clone(), gemini.clone());

        let mut req = request();
        req.provider = String::new();
        generate_content(&providers, req).await.unwrap();

        assert_eq!(openai.calls(), 1);
        assert_eq!(gemini.calls(), 0);
    }

    #[tokio::test]
    async fn test_gemini_tag_dispatches_to_gemini() {
        let openai = MockGenerator::replying(&valid_reply());
        let gemini = MockGenerator::replying(&valid_reply());
        let providers = registry(openai.clone(), gemini.clone());

        let mut req = request();
        req.provider = "gemini".to_string();
        generate_content(&providers, req).await.unwrap();

        assert_eq!(openai.calls(), 0);
        assert_eq!(gemini.calls(), 1);
    }

    #[tokio::test]
    async fn test_blank_model_uses_adapter_default_and_key_is_forwarded() {
        let openai = MockGenerator::replying(&valid_reply());
        let providers = registry(openai.clone(), MockGenerator::replying(&valid_reply()));

        let mut req = request();
        req.model = "  ".to_string();
        generate_content(&providers, req).await.unwrap();

        let (prompt, model, key) = openai.last_call.lock().unwrap().clone().unwrap();
        assert_eq!(model, "mock-default");
        assert_eq!(key, "k");
        assert!(prompt.contains("- Secondary keywords: fast, cheap"));
        assert!(prompt.contains("- Tone: clear, helpful"));
        assert!(prompt.contains("- Call to action: Contact us"));
    }

    #[tokio::test]
    async fn test_explicit_model_is_forwarded() {
        let openai = MockGenerator::replying(&valid_reply());
        let providers = registry(openai.clone(), MockGenerator::replying(&valid_reply()));

        let mut req = request();
        req.model = "gpt-4o".to_string();
        generate_content(&providers, req).await.unwrap();

        let (_, model, _) = openai.last_call.lock().unwrap().clone().unwrap();
        assert_eq!(model, "gpt-4o");
    }

    #[tokio::test]
    async fn test_missing_html_is_upstream_content_error_with_raw() {
        let reply = r#"{"metaTitle":"T","metaDescription":"D","schemaJsonLd":"{}"}"#;
        let providers = registry(
            MockGenerator::replying(reply),
            MockGenerator::replying(reply),
        );

        let err = generate_content(&providers, request()).await.unwrap_err();
        match err {
            AppError::UpstreamContent { message, raw } => {
                assert_eq!(message, INVALID_FIELDS_MESSAGE);
                assert_eq!(
                    raw,
                    json!({"metaTitle": "T", "metaDescription": "D", "schemaJsonLd": "{}"})
                );
            }
            other => panic!("expected UpstreamContent, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_provider_failure_is_wrapped() {
        let providers = registry(
            MockGenerator::failing(429),
            MockGenerator::replying(&valid_reply()),
        );

        let err = generate_content(&providers, request()).await.unwrap_err();
        assert!(matches!(err, AppError::Provider(LlmError::Api { status: 429, .. })));
    }

    #[tokio::test]
    async fn test_h1_uses_raw_request_fields() {
        let providers = registry(
            MockGenerator::replying(&valid_reply()),
            MockGenerator::replying(&valid_reply()),
        );
        let mut req = request();
        req.service = "x".repeat(40);
        req.city = "y".repeat(30);

        // 40 + " in ".len() + 30 = 74 > 70
        let response = generate_content(&providers, req).await.unwrap();
        assert!(!response.seo_score.checks.h1_ok);
    }

    #[test]
    fn test_schema_object_is_pretty_printed_and_round_trips() {
        let schema = json!({
            "@context": "https://schema.org",
            "@type": "FAQPage",
            "mainEntity": [{"@type": "Question", "name": "Q1"}]
        });
        let reply = json!({
            "metaTitle": "T",
            "metaDescription": "D",
            "html": "<h1>H</h1>",
            "schemaJsonLd": schema
        })
        .to_string();

        let content = parse_generated_content(&reply).unwrap();
        assert!(content.schema_json_ld.contains("\n  \"@context\""));
        let round_trip: Value = serde_json::from_str(&content.schema_json_ld).unwrap();
        assert_eq!(round_trip, schema);
    }

    #[test]
    fn test_prose_wrapped_reply_is_recovered() {
        let reply = format!("Here you go:\n```json\n{}\n```\nEnjoy!", valid_reply());
        let content = parse_generated_content(&reply).unwrap();
        assert_eq!(content.meta_title.len(), 55);
    }

    #[test]
    fn test_unrecoverable_reply_reports_empty_raw() {
        let err = parse_generated_content("garbage {not json} more").unwrap_err();
        match err {
            AppError::UpstreamContent { raw, .. } => assert_eq!(raw, json!({})),
            other => panic!("expected UpstreamContent, got {other:?}"),
        }
    }

    #[test]
    fn test_reply_without_braces_is_missing_fields() {
        let err = parse_generated_content("no json here").unwrap_err();
        assert!(matches!(err, AppError::UpstreamContent { ref raw, .. } if *raw == json!({})));
    }

    #[test]
    fn test_empty_or_non_string_fields_count_as_missing() {
        let reply = json!({
            "metaTitle": "",
            "metaDescription": "D",
            "html": "<h1>H</h1>",
            "schemaJsonLd": "{}"
        })
        .to_string();
        assert!(parse_generated_content(&reply).is_err());

        let reply = json!({
            "metaTitle": 42,
            "metaDescription": "D",
            "html": "<h1>H</h1>",
            "schemaJsonLd": "{}"
        })
        .to_string();
        assert!(parse_generated_content(&reply).is_err());
    }

    #[test]
    fn test_null_schema_counts_as_missing() {
        let reply = json!({
            "metaTitle": "T",
            "metaDescription": "D",
            "html": "<h1>H</h1>",
            "schemaJsonLd": null
        })
        .to_string();
        assert!(parse_generated_content(&reply).is_err());
    }
}
