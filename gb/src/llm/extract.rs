//! Text extraction from generation responses
//!
//! Strategies are tried in order; the first one that yields non-blank text
//! wins. Extraction fails only when none of them do.

use tracing::debug;

use super::{GenerateResponse, LlmError};

/// One way of pulling text out of a response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionStrategy {
    /// The flat `text` field
    FlatText,
    /// Concatenated part texts of the first candidate that has any
    CandidateParts,
}

impl ExtractionStrategy {
    /// Default order: flat text first, then candidate parts
    pub const DEFAULT_ORDER: &'static [ExtractionStrategy] = &[Self::FlatText, Self::CandidateParts];

    /// Apply this strategy, returning `None` when it finds nothing usable
    pub fn extract(&self, response: &GenerateResponse) -> Option<String> {
        debug!(?self, "ExtractionStrategy::extract: called");
        let text = match self {
            Self::FlatText => response.text.clone(),
            Self::CandidateParts => response.candidates.iter().find_map(|candidate| {
                let content = candidate.content.as_ref()?;
                let joined: String = content.parts.iter().filter_map(|p| p.text.as_deref()).collect();
                if joined.is_empty() { None } else { Some(joined) }
            }),
        };
        text.filter(|t| !t.trim().is_empty())
    }
}

/// Ordered list of extraction strategies
#[derive(Debug, Clone)]
pub struct TextExtractor {
    strategies: Vec<ExtractionStrategy>,
}

impl Default for TextExtractor {
    fn default() -> Self {
        Self::new(ExtractionStrategy::DEFAULT_ORDER.to_vec())
    }
}

impl TextExtractor {
    pub fn new(strategies: Vec<ExtractionStrategy>) -> Self {
        Self { strategies }
    }

    /// Run strategies in order until one yields text
    pub fn extract(&self, response: &GenerateResponse) -> Result<String, LlmError> {
        debug!(strategy_count = self.strategies.len(), "TextExtractor::extract: called");
        for strategy in &self.strategies {
            if let Some(text) = strategy.extract(response) {
                debug!(?strategy, text_len = text.len(), "TextExtractor::extract: strategy matched");
                return Ok(text);
            }
        }
        debug!("TextExtractor::extract: no strategy yielded text");
        Err(LlmError::Extraction(format!(
            "{} candidate(s), no text field",
            response.candidates.len()
        )))
    }
}
