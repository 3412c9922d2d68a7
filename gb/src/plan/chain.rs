//! Model chain orchestration
//!
//! Tries each model in priority order, sequentially. A model that fails (after
//! the invoker's own retries) hands over to the next one; when the chain is
//! exhausted, or there is no client at all, the offline fallback is used.

use tracing::{debug, error, info};

use super::invoker::ModelInvoker;
use crate::config::{DEFAULT_MODEL_CHAIN, LlmConfig};
use crate::llm::GenerationConfig;

/// Ordered candidate models, highest priority first
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelChain {
    models: Vec<String>,
}

impl Default for ModelChain {
    fn default() -> Self {
        Self {
            models: DEFAULT_MODEL_CHAIN.iter().map(|m| m.to_string()).collect(),
        }
    }
}

impl ModelChain {
    /// Build a chain; blank entries are dropped and an empty result falls back
    /// to the built-in order
    pub fn new(models: Vec<String>) -> Self {
        let models: Vec<String> = models
            .into_iter()
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty())
            .collect();
        if models.is_empty() {
            debug!("ModelChain::new: empty chain, using built-in order");
            return Self::default();
        }
        Self { models }
    }

    pub fn from_config(config: &LlmConfig) -> Self {
        Self::new(config.model_chain.clone())
    }

    pub fn models(&self) -> &[String] {
        &self.models
    }
}

/// Runs a prompt down the model chain
pub struct ChainOrchestrator {
    /// `None` means offline mode
    invoker: Option<ModelInvoker>,
    chain: ModelChain,
    generation: GenerationConfig,
}

impl ChainOrchestrator {
    pub fn new(invoker: Option<ModelInvoker>, chain: ModelChain, generation: GenerationConfig) -> Self {
        debug!(
            online = invoker.is_some(),
            models = ?chain.models(),
            "ChainOrchestrator::new: called"
        );
        Self {
            invoker,
            chain,
            generation,
        }
    }

    pub fn is_offline(&self) -> bool {
        self.invoker.is_none()
    }

    pub fn chain(&self) -> &ModelChain {
        &self.chain
    }

    /// Produce a result for `prompt`, never failing
    ///
    /// `parse` turns a model's text into the result (and absorbs schema
    /// problems itself); `fallback` is used when no model produced text.
    pub async fn run<T, P, F>(&self, prompt: &str, parse: P, fallback: F) -> T
    where
        P: Fn(&str) -> T + Sync,
        F: FnOnce() -> T,
    {
        let Some(invoker) = &self.invoker else {
            debug!("run: offline mode, using fallback");
            return fallback();
        };

        for model in self.chain.models() {
            match invoker.invoke(model, prompt, &self.generation, &parse).await {
                Ok(result) => {
                    debug!(%model, "run: model succeeded");
                    return result;
                }
                Err(e) => {
                    info!(%model, error = %e, "Model failed, attempting next fallback");
                }
            }
        }

        error!(models = self.chain.models().len(), "All models failed, returning offline fallback");
        fallback()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::client::mock::{Scripted, ScriptedClient};
    use crate::plan::invoker::RetryPolicy;
    use std::sync::Arc;
    use std::time::Duration;

    fn orchestrator(client: Arc<ScriptedClient>, models: &[&str]) -> ChainOrchestrator {
        let policy = RetryPolicy {
            max_attempts: 3,
            base_delay: Duration::from_millis(1000),
        };
        ChainOrchestrator::new(
            Some(ModelInvoker::new(client, policy)),
            ModelChain::new(models.iter().map(|m| m.to_string()).collect()),
            GenerationConfig::json(0.1, 512),
        )
    }

    #[test]
    fn test_model_chain_drops_blanks() {
        let chain = ModelChain::new(vec![" a ".to_string(), "".to_string(), "b".to_string()]);
        assert_eq!(chain.models(), &["a", "b"]);
    }

    #[test]
    fn test_empty_model_chain_uses_default() {
        let chain = ModelChain::new(vec!["  ".to_string()]);
        assert_eq!(chain, ModelChain::default());
        assert_eq!(chain.models()[0], "gemini-3-pro-latest");
    }

    #[tokio::test]
    async fn test_first_model_wins() {
        let client = Arc::new(
            ScriptedClient::new()
                .script("a", vec![Scripted::Text("from a".to_string())])
                .script("b", vec![Scripted::Text("from b".to_string())]),
        );
        let orch = orchestrator(client.clone(), &["a", "b"]);

        let out = orch.run("p", |t| t.to_string(), || "fallback".to_string()).await;

        assert_eq!(out, "from a");
        assert_eq!(client.calls_for("b"), 0);
    }

    #[tokio::test]
    async fn test_falls_through_on_non_rate_limit_error() {
        let client = Arc::new(
            ScriptedClient::new()
                .script("a", vec![Scripted::ApiError(400, "bad model".to_string())])
                .script("b", vec![Scripted::Text("from b".to_string())]),
        );
        let orch = orchestrator(client.clone(), &["a", "b"]);

        let out = orch.run("p", |t| t.to_string(), || "fallback".to_string()).await;

        assert_eq!(out, "from b");
        assert_eq!(client.calls_for("a"), 1);
        assert_eq!(client.calls_for("b"), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rate_limited_model_exhausts_retries_then_advances() {
        let client = Arc::new(
            ScriptedClient::new()
                .script("a", vec![Scripted::RateLimited])
                .script("b", vec![Scripted::Text("from b".to_string())]),
        );
        let orch = orchestrator(client.clone(), &["a", "b"]);

        let out = orch.run("p", |t| t.to_string(), || "fallback".to_string()).await;

        assert_eq!(out, "from b");
        assert_eq!(client.calls_for("a"), 3);
    }

    #[tokio::test]
    async fn test_all_models_fail_uses_fallback() {
        let client = Arc::new(ScriptedClient::new().script("a", vec![Scripted::Empty]));
        let orch = orchestrator(client.clone(), &["a", "missing"]);

        let out = orch.run("p", |t| t.to_string(), || "fallback".to_string()).await;

        assert_eq!(out, "fallback");
        assert_eq!(client.call_count(), 2);
    }

    #[tokio::test]
    async fn test_offline_uses_fallback_without_calls() {
        let orch = ChainOrchestrator::new(None, ModelChain::default(), GenerationConfig::json(0.1, 512));
        assert!(orch.is_offline());

        let out = orch.run("p", |t| t.to_string(), || "fallback".to_string()).await;
        assert_eq!(out, "fallback");
    }
}
