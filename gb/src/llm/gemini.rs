//! Gemini REST client implementation
//!
//! Implements the GenerativeClient trait for the `generateContent` endpoint.
//! One HTTP call per request; retries are the invoker's job.

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, warn};

use super::{GenerateResponse, GenerationConfig, GenerationRequest, GenerativeClient, LlmError};
use crate::config::LlmConfig;

/// Gemini API client
pub struct GeminiClient {
    api_key: String,
    base_url: String,
    http: Client,
    timeout: Duration,
}

impl GeminiClient {
    /// Create a new client from configuration and an already-resolved API key
    pub fn from_config(config: &LlmConfig, api_key: String) -> Result<Self, LlmError> {
        debug!(base_url = %config.base_url, timeout_ms = config.timeout_ms, "from_config: called");
        let timeout = Duration::from_millis(config.timeout_ms);

        let http = Client::builder().timeout(timeout).build().map_err(LlmError::Network)?;

        Ok(Self {
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            http,
            timeout,
        })
    }

    fn endpoint(&self, model: &str) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.base_url, model)
    }

    /// Build the request body for the generateContent API
    fn build_request_body<'a>(&self, request: &'a GenerationRequest) -> GeminiRequest<'a> {
        debug!(model = %request.model, prompt_len = request.prompt.len(), "build_request_body: called");
        GeminiRequest {
            contents: vec![GeminiContent {
                role: "user",
                parts: vec![GeminiPart { text: &request.prompt }],
            }],
            generation_config: &request.config,
        }
    }
}

#[async_trait]
impl GenerativeClient for GeminiClient {
    async fn generate(&self, request: GenerationRequest) -> Result<GenerateResponse, LlmError> {
        debug!(model = %request.model, "generate: called");
        let url = self.endpoint(&request.model);
        let body = self.build_request_body(&request);

        let response = match self
            .http
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
        {
            Ok(r) => r,
            Err(e) if e.is_timeout() => {
                warn!(model = %request.model, timeout = ?self.timeout, "generate: request timed out");
                return Err(LlmError::Timeout(self.timeout));
            }
            Err(e) => {
                debug!(error = %e, "generate: network error");
                return Err(LlmError::Network(e));
            }
        };

        let status = response.status().as_u16();

        if status == 429 {
            let message = response.text().await.unwrap_or_default();
            debug!(model = %request.model, "generate: rate limited (429)");
            return Err(LlmError::RateLimited { message });
        }

        if !response.status().is_success() {
            let message = response.text().await.unwrap_or_default();
            debug!(%status, "generate: API error");
            return Err(LlmError::ApiError { status, message });
        }

        let text = response.text().await?;
        let parsed: GenerateResponse = serde_json::from_str(&text)?;
        debug!(candidate_count = parsed.candidates.len(), "generate: success");
        Ok(parsed)
    }
}

// Gemini API request types

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest<'a> {
    contents: Vec<GeminiContent<'a>>,
    generation_config: &'a GenerationConfig,
}

#[derive(Debug, Serialize)]
struct GeminiContent<'a> {
    role: &'static str,
    parts: Vec<GeminiPart<'a>>,
}

#[derive(Debug, Serialize)]
struct GeminiPart<'a> {
    text: &'a str,
}
