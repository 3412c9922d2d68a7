//! LLM Client module for GoalBreaker
//!
//! Provides the generation client trait, the Gemini implementation, and
//! response text extraction.

use std::sync::Arc;

use tracing::{debug, info};

pub mod client;
mod error;
mod extract;
mod gemini;
mod types;

pub use client::GenerativeClient;
pub use error::{LlmError, RATE_LIMIT_MARKERS};
pub use extract::{ExtractionStrategy, TextExtractor};
pub use gemini::GeminiClient;
pub use types::{
    Candidate, CandidateContent, GenerateResponse, GenerationConfig, GenerationRequest, JSON_MIME_TYPE, Part,
};

use crate::config::LlmConfig;

/// Create a generation client if an API key is configured
///
/// Returns `Ok(None)` when the key env var is unset or blank, which puts the
/// caller into offline mode.
pub fn create_client(config: &LlmConfig) -> Result<Option<Arc<dyn GenerativeClient>>, LlmError> {
    debug!(api_key_env = %config.api_key_env, "create_client: called");
    match config.get_api_key() {
        Some(api_key) => {
            debug!("create_client: creating Gemini client");
            Ok(Some(Arc::new(GeminiClient::from_config(config, api_key)?)))
        }
        None => {
            info!(api_key_env = %config.api_key_env, "No API key configured, running offline");
            Ok(None)
        }
    }
}
