//! Axum route handlers for the content API.

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::Serialize;

use crate::content::generator::generate_content;
use crate::content::models::{GenerationRequest, GenerationResponse};
use crate::errors::AppError;
use crate::llm_client::Provider;
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderInfo {
    pub id: Provider,
    pub default_model: String,
}

#[derive(Debug, Serialize)]
pub struct ProvidersResponse {
    pub providers: Vec<ProviderInfo>,
    pub default: Provider,
}

/// POST /api/v1/generate
///
/// Builds the prompt, calls the selected provider once, and returns the
/// validated content with its SEO score. Unreadable bodies get a JSON 400.
pub async fn handle_generate(
    State(state): State<AppState>,
    payload: Result<Json<GenerationRequest>, JsonRejection>,
) -> Result<Json<GenerationResponse>, AppError> {
    let Json(request) = payload?;
    let response = generate_content(&state.providers, request).await?;
    Ok(Json(response))
}

/// GET /api/v1/providers
pub async fn handle_list_providers(State(state): State<AppState>) -> Json<ProvidersResponse> {
    let providers = Provider::ALL
        .iter()
        .map(|&id| ProviderInfo {
            id,
            default_model: state.providers.get(id).default_model().to_string(),
        })
        .collect();

    Json(ProvidersResponse {
        providers,
        default: Provider::default(),
    })
}
