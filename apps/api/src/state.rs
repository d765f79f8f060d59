use crate::llm_client::ProviderRegistry;

/// Shared application state injected into all route handlers via Axum extractors.
/// Holds no per-request data: every generation is isolated end to end.
#[derive(Clone)]
pub struct AppState {
    /// One adapter per supported provider, selected by the request's tag.
    pub providers: ProviderRegistry,
}
