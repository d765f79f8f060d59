use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Every variable has a default; provider credentials are never read here,
/// they arrive with each request.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub openai_base_url: String,
    pub openai_default_model: String,
    pub gemini_base_url: String,
    pub gemini_default_model: String,
    /// Per-call timeout for provider HTTP requests.
    pub provider_timeout_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            port: env_or("PORT", "8080")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: env_or("RUST_LOG", "info"),
            openai_base_url: env_or("OPENAI_BASE_URL", "https://api.openai.com/v1"),
            openai_default_model: env_or("OPENAI_DEFAULT_MODEL", "gpt-4o-mini"),
            gemini_base_url: env_or(
                "GEMINI_BASE_URL",
                "https://generativelanguage.googleapis.com/v1beta",
            ),
            gemini_default_model: env_or("GEMINI_DEFAULT_MODEL", "gemini-2.0-flash"),
            provider_timeout_secs: env_or("PROVIDER_TIMEOUT_SECS", "120")
                .parse::<u64>()
                .context("PROVIDER_TIMEOUT_SECS must be a whole number of seconds")?,
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
