//! Guardrail verdict types

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Classification of an incoming goal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GuardrailStatus {
    /// Actionable request, safe to plan
    #[default]
    Ok,
    /// Noise, repeated characters, unparseable text
    Gibberish,
    /// Insults or harassment aimed at the operator
    Abuse,
}

impl GuardrailStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::Gibberish => "gibberish",
            Self::Abuse => "abuse",
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok)
    }
}

impl std::fmt::Display for GuardrailStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Per-request guardrail result; never cached or persisted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuardrailVerdict {
    pub status: GuardrailStatus,
    pub reason: String,
}

impl GuardrailVerdict {
    pub fn new(status: GuardrailStatus, reason: impl Into<String>) -> Self {
        let reason = reason.into();
        debug!(%status, %reason, "GuardrailVerdict::new: called");
        Self { status, reason }
    }

    pub fn ok(reason: impl Into<String>) -> Self {
        Self::new(GuardrailStatus::Ok, reason)
    }

    pub fn gibberish(reason: impl Into<String>) -> Self {
        Self::new(GuardrailStatus::Gibberish, reason)
    }

    pub fn abuse(reason: impl Into<String>) -> Self {
        Self::new(GuardrailStatus::Abuse, reason)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verdict_serializes_lowercase_status() {
        let verdict = GuardrailVerdict::gibberish("empty input");
        let json = serde_json::to_value(&verdict).unwrap();
        assert_eq!(json["status"], "gibberish");
        assert_eq!(json["reason"], "empty input");
    }

    #[test]
    fn test_status_is_ok() {
        assert!(GuardrailStatus::Ok.is_ok());
        assert!(!GuardrailStatus::Abuse.is_ok());
        assert_eq!(GuardrailStatus::default(), GuardrailStatus::Ok);
    }
}
