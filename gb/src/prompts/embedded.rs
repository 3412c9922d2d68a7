//! Embedded prompts
//!
//! These are compiled into the binary from .pmt files at build time.

use tracing::debug;

/// Five-step goal breakdown prompt
pub const BREAKDOWN: &str = include_str!("../../prompts/breakdown.pmt");

/// Three-item sub-breakdown prompt
pub const SUB_BREAKDOWN: &str = include_str!("../../prompts/sub-breakdown.pmt");

/// Guardrail classification prompt
pub const GUARDRAIL: &str = include_str!("../../prompts/guardrail.pmt");

/// Get the embedded prompt by name
pub fn get_embedded(name: &str) -> Option<&'static str> {
    debug!(%name, "get_embedded: called");
    match name {
        "breakdown" => Some(BREAKDOWN),
        "sub-breakdown" => Some(SUB_BREAKDOWN),
        "guardrail" => Some(GUARDRAIL),
        _ => {
            debug!("get_embedded: no match found");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_embedded_breakdown() {
        let breakdown = get_embedded("breakdown").unwrap();
        assert!(breakdown.contains("exactly 5"));
        assert!(breakdown.contains("\"complexity\""));
        assert!(breakdown.contains("{{goal}}"));
    }

    #[test]
    fn test_get_embedded_sub_breakdown() {
        let sub = get_embedded("sub-breakdown").unwrap();
        assert!(sub.contains("\"substeps\""));
        assert!(sub.contains("{{step}}"));
    }

    #[test]
    fn test_get_embedded_guardrail() {
        let guard = get_embedded("guardrail").unwrap();
        assert!(guard.contains("GIBBERISH"));
        assert!(guard.contains("ABUSE"));
    }

    #[test]
    fn test_get_embedded_unknown() {
        assert!(get_embedded("unknown-template").is_none());
    }
}
