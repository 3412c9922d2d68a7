//! LLM error types

use std::time::Duration;
use thiserror::Error;

/// Substrings (lowercase) that mark an error as a rate-limit / quota condition
pub const RATE_LIMIT_MARKERS: &[&str] = &["429", "rate limit", "resource_exhausted", "resource exhausted"];

/// Errors that can occur during LLM operations
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("Rate limited (429): {message}")]
    RateLimited { message: String },

    #[error("API error {status}: {message}")]
    ApiError { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Timeout after {0:?}")]
    Timeout(Duration),

    #[error("No usable text in model response: {0}")]
    Extraction(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl LlmError {
    /// Check if this is a rate limit / quota error
    ///
    /// Classification is textual: besides the dedicated variant, any error whose
    /// message mentions 429, "rate limit" or "resource exhausted" counts.
    pub fn is_rate_limit(&self) -> bool {
        if matches!(self, LlmError::RateLimited { .. }) {
            return true;
        }
        let message = self.to_string().to_lowercase();
        RATE_LIMIT_MARKERS.iter().any(|marker| message.contains(marker))
    }
}
