//! Model invoker: one model, bounded rate-limit retries
//!
//! Only rate-limit/quota failures are retried, with exponential backoff plus
//! jitter. Everything else is surfaced on the first failure so the chain can
//! move on to the next model.

use std::sync::Arc;
use std::time::Duration;

use rand::Rng;
use tracing::{debug, warn};

use crate::config::RetryConfig;
use crate::llm::{GenerationConfig, GenerationRequest, GenerativeClient, LlmError, TextExtractor};

/// Upper bound (exclusive) of the random jitter added to each backoff
pub const MAX_JITTER: Duration = Duration::from_millis(500);

/// Retry policy for rate-limited calls
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum attempts, including the first (never less than one)
    pub max_attempts: u32,
    /// Delay before the second attempt; doubled for each later one
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&RetryConfig::default())
    }
}

impl RetryPolicy {
    pub fn from_config(config: &RetryConfig) -> Self {
        Self {
            max_attempts: config.max_attempts.max(1),
            base_delay: Duration::from_millis(config.base_delay_ms),
        }
    }

    /// `base_delay * 2^(attempt-1) + jitter` for the failed `attempt` (1-based)
    pub fn backoff_delay(&self, attempt: u32, jitter: Duration) -> Duration {
        let exponent = attempt.saturating_sub(1).min(16);
        self.base_delay.saturating_mul(1 << exponent).saturating_add(jitter)
    }

    /// Backoff for `attempt` with random jitter in `[0, MAX_JITTER)`
    pub fn next_backoff(&self, attempt: u32) -> Duration {
        let jitter_ms = rand::rng().random_range(0..MAX_JITTER.as_millis() as u64);
        self.backoff_delay(attempt, Duration::from_millis(jitter_ms))
    }
}

/// Issues generation calls against a single named model
pub struct ModelInvoker {
    client: Arc<dyn GenerativeClient>,
    policy: RetryPolicy,
    extractor: TextExtractor,
}

impl ModelInvoker {
    pub fn new(client: Arc<dyn GenerativeClient>, policy: RetryPolicy) -> Self {
        debug!(?policy, "ModelInvoker::new: called");
        Self {
            client,
            policy,
            extractor: TextExtractor::default(),
        }
    }

    /// Replace the text extraction strategies
    pub fn with_extractor(mut self, extractor: TextExtractor) -> Self {
        self.extractor = extractor;
        self
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    /// Call `model` with `prompt` and hand the extracted text to `parse`
    ///
    /// Rate-limit failures are retried until `max_attempts` is reached; any
    /// other failure (including an unusable response) returns immediately.
    /// The last error is returned as-is.
    pub async fn invoke<T, P>(
        &self,
        model: &str,
        prompt: &str,
        config: &GenerationConfig,
        parse: &P,
    ) -> Result<T, LlmError>
    where
        P: Fn(&str) -> T + Sync,
    {
        debug!(%model, max_attempts = self.policy.max_attempts, "invoke: called");
        let request = GenerationRequest::new(model, prompt, config.clone());
        let max_attempts = self.policy.max_attempts.max(1);

        let mut attempt = 1;
        loop {
            let outcome = match self.client.generate(request.clone()).await {
                Ok(response) => self.extractor.extract(&response),
                Err(e) => Err(e),
            };

            let err = match outcome {
                Ok(text) => {
                    debug!(%model, attempt, "invoke: success");
                    return Ok(parse(&text));
                }
                Err(e) => e,
            };

            if !err.is_rate_limit() || attempt >= max_attempts {
                warn!(%model, attempt, error = %err, "Model call failed");
                return Err(err);
            }

            let backoff = self.policy.next_backoff(attempt);
            warn!(
                %model,
                attempt,
                max_attempts,
                backoff_ms = backoff.as_millis() as u64,
                "Rate limit hit, retrying"
            );
            tokio::time::sleep(backoff).await;
            attempt += 1;
        }
    }
}
