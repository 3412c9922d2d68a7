//! Generation request/response types
//!
//! The response side mirrors the heterogeneous shapes a generation backend may
//! return: either a flat `text` field or a list of candidates whose content is
//! split into parts.

use serde::{Deserialize, Serialize};
use tracing::debug;

/// MIME type requested for every generation call
pub const JSON_MIME_TYPE: &str = "application/json";

/// Sampling settings for one call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub temperature: f32,
    pub max_output_tokens: u32,
    pub response_mime_type: String,
}

impl GenerationConfig {
    /// JSON-mode config with the given sampling settings
    pub fn json(temperature: f32, max_output_tokens: u32) -> Self {
        debug!(%temperature, %max_output_tokens, "GenerationConfig::json: called");
        Self {
            temperature,
            max_output_tokens,
            response_mime_type: JSON_MIME_TYPE.to_string(),
        }
    }
}

/// Everything needed for one generation call against one model
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    /// Model identifier (e.g. "gemini-2.5-flash")
    pub model: String,

    /// Fully rendered prompt
    pub prompt: String,

    pub config: GenerationConfig,
}

impl GenerationRequest {
    pub fn new(model: impl Into<String>, prompt: impl Into<String>, config: GenerationConfig) -> Self {
        Self {
            model: model.into(),
            prompt: prompt.into(),
            config,
        }
    }
}

/// Raw response from a generation backend
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
    /// Convenience flat text, when the backend provides one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

impl GenerateResponse {
    /// Response carrying only flat text
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            candidates: vec![],
        }
    }

    /// Response carrying a single candidate split into the given parts
    pub fn from_parts<I, S>(parts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            text: None,
            candidates: vec![Candidate {
                content: Some(CandidateContent {
                    parts: parts.into_iter().map(|t| Part { text: Some(t.into()) }).collect(),
                }),
                finish_reason: None,
            }],
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<CandidateContent>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Part {
    #[serde(default)]
    pub text: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generation_config_json() {
        let config = GenerationConfig::json(0.1, 512);
        let value = serde_json::to_value(&config).unwrap();
        assert_eq!(value["responseMimeType"], "application/json");
        assert_eq!(value["maxOutputTokens"], 512);
    }

    #[test]
    fn test_deserialize_candidates_shape() {
        let body = r#"{
            "candidates": [
                {"content": {"parts": [{"text": "{\"a\":"}, {"text": "1}"}], "role": "model"}, "finishReason": "STOP"}
            ],
            "usageMetadata": {"promptTokenCount": 10}
        }"#;
        let response: GenerateResponse = serde_json::from_str(body).unwrap();
        assert!(response.text.is_none());
        assert_eq!(response.candidates.len(), 1);
        assert_eq!(response.candidates[0].finish_reason.as_deref(), Some("STOP"));
        let parts = &response.candidates[0].content.as_ref().unwrap().parts;
        assert_eq!(parts.len(), 2);
    }

    #[test]
    fn test_deserialize_empty_object() {
        let response: GenerateResponse = serde_json::from_str("{}").unwrap();
        assert!(response.text.is_none());
        assert!(response.candidates.is_empty());
    }
}
