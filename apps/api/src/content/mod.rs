// SEO content generation: request normalization, prompt building, lenient
// JSON recovery, field validation and scoring.
// All provider calls go through llm_client; no direct HTTP calls here.

pub mod generator;
pub mod handlers;
pub mod json_recovery;
pub mod models;
pub mod prompts;
pub mod scoring;
