//! Model-backed guardrail classifier
//!
//! One call to a lightweight model, no retries. Any failure fails open with an
//! `ok` verdict so a broken classifier never blocks a legitimate goal.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, warn};

use super::heuristic::heuristic_verdict;
use crate::domain::{GuardrailStatus, GuardrailVerdict};
use crate::llm::{GenerationConfig, GenerationRequest, GenerativeClient, LlmError, TextExtractor};
use crate::prompts::{PromptError, PromptLoader};

/// Reason reported when classification itself failed
pub const GUARDRAIL_ERROR_REASON: &str = "guardrail_error";

/// Lowercased status prefixes and the status they map to; anything else is `Ok`
pub const STATUS_PREFIXES: &[(&str, GuardrailStatus)] = &[
    ("gib", GuardrailStatus::Gibberish),
    ("abuse", GuardrailStatus::Abuse),
    ("harass", GuardrailStatus::Abuse),
];

const GUARDRAIL_TEMPERATURE: f32 = 0.0;
const GUARDRAIL_MAX_OUTPUT_TOKENS: u32 = 128;

/// Map a raw model status label onto a guardrail status
pub fn normalize_status(raw: &str) -> GuardrailStatus {
    let lowered = raw.trim().to_lowercase();
    STATUS_PREFIXES
        .iter()
        .find(|(prefix, _)| lowered.starts_with(prefix))
        .map(|(_, status)| *status)
        .unwrap_or_default()
}

#[derive(Debug, thiserror::Error)]
enum ClassifyError {
    #[error(transparent)]
    Prompt(#[from] PromptError),
    #[error(transparent)]
    Llm(#[from] LlmError),
    #[error("Verdict is not a JSON object")]
    NotAnObject,
}

/// Labels goals as ok, gibberish or abuse
pub struct GuardrailClassifier {
    /// `None` means heuristic-only
    client: Option<Arc<dyn GenerativeClient>>,
    model: String,
    prompts: Arc<PromptLoader>,
    extractor: TextExtractor,
}

impl GuardrailClassifier {
    pub fn new(
        client: Option<Arc<dyn GenerativeClient>>,
        model: impl Into<String>,
        prompts: Arc<PromptLoader>,
    ) -> Self {
        let model = model.into();
        debug!(online = client.is_some(), %model, "GuardrailClassifier::new: called");
        Self {
            client,
            model,
            prompts,
            extractor: TextExtractor::default(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Classify a goal
    pub async fn classify(&self, goal: &str) -> GuardrailVerdict {
        debug!(goal_len = goal.len(), "classify: called");
        if goal.trim().is_empty() {
            return GuardrailVerdict::gibberish("empty input");
        }

        let Some(client) = &self.client else {
            debug!("classify: offline, using heuristic");
            return heuristic_verdict(goal);
        };

        match self.classify_with_model(client.as_ref(), goal).await {
            Ok(verdict) => verdict,
            Err(e) => {
                warn!(model = %self.model, error = %e, "Guardrail classification failed");
                GuardrailVerdict::ok(GUARDRAIL_ERROR_REASON)
            }
        }
    }

    async fn classify_with_model(
        &self,
        client: &dyn GenerativeClient,
        goal: &str,
    ) -> Result<GuardrailVerdict, ClassifyError> {
        let prompt = self.prompts.guardrail_prompt(goal)?;
        let request = GenerationRequest::new(
            self.model.as_str(),
            prompt,
            GenerationConfig::json(GUARDRAIL_TEMPERATURE, GUARDRAIL_MAX_OUTPUT_TOKENS),
        );
        let response = client.generate(request).await?;
        let text = self.extractor.extract(&response)?;
        parse_verdict(&text)
    }
}

fn parse_verdict(payload: &str) -> Result<GuardrailVerdict, ClassifyError> {
    let data: Value = serde_json::from_str(payload).map_err(LlmError::from)?;
    let data = data.as_object().ok_or(ClassifyError::NotAnObject)?;

    let status = match data.get("status") {
        Some(Value::String(s)) => normalize_status(s),
        Some(other) => normalize_status(&other.to_string()),
        None => GuardrailStatus::Ok,
    };
    let reason = match data.get("reason") {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    };

    Ok(GuardrailVerdict::new(status, reason))
}
