//! GenerativeClient trait definition

use async_trait::async_trait;

use super::{GenerateResponse, GenerationRequest, LlmError};

/// Stateless generation client - each call is independent
///
/// Retry, fallback and validation all live above this trait; an
/// implementation performs exactly one outbound call per `generate`.
#[async_trait]
pub trait GenerativeClient: Send + Sync {
    /// Send a single generation request against `request.model`
    async fn generate(&self, request: GenerationRequest) -> Result<GenerateResponse, LlmError>;
}
