//! Local guardrail heuristic, used when no model client is available

use std::collections::HashSet;

use tracing::debug;

use crate::domain::GuardrailVerdict;

/// Lowercased tokens that mark a goal as abusive
pub const ABUSIVE_TOKENS: &[&str] = &["idiot", "stupid", "dumb", "hate", "trash"];

/// Text longer than this with at most `NOISE_MAX_DISTINCT` letters is noise
const NOISE_MIN_LEN: usize = 12;
const NOISE_MAX_DISTINCT: usize = 2;

/// Classify a goal without calling a model
pub fn heuristic_verdict(goal: &str) -> GuardrailVerdict {
    let text = goal.trim();
    debug!(len = text.len(), "heuristic_verdict: called");
    if text.is_empty() {
        return GuardrailVerdict::gibberish("empty input");
    }

    let distinct: HashSet<char> = text.chars().filter(|c| c.is_alphabetic()).collect();
    if distinct.len() <= NOISE_MAX_DISTINCT && text.chars().count() > NOISE_MIN_LEN {
        return GuardrailVerdict::gibberish("low-information noise");
    }

    let lowered = text.to_lowercase();
    if ABUSIVE_TOKENS.iter().any(|token| lowered.contains(token)) {
        return GuardrailVerdict::abuse("detected abusive keyword");
    }

    GuardrailVerdict::ok("heuristic pass")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::GuardrailStatus;

    #[test]
    fn test_empty_is_gibberish() {
        let verdict = heuristic_verdict("   ");
        assert_eq!(verdict, GuardrailVerdict::gibberish("empty input"));
    }

    #[test]
    fn test_repeated_characters_are_gibberish() {
        assert_eq!(heuristic_verdict("aaaaaaaaaaaaaa").status, GuardrailStatus::Gibberish);
        assert_eq!(heuristic_verdict("abababababababab").status, GuardrailStatus::Gibberish);
        assert_eq!(heuristic_verdict("!!!!!!!!!!!!!!!!").status, GuardrailStatus::Gibberish);
    }

    #[test]
    fn test_short_repetition_passes() {
        // Twelve characters is not long enough to count as noise
        assert_eq!(heuristic_verdict("aaaaaaaaaaaa").status, GuardrailStatus::Ok);
    }

    #[test]
    fn test_abusive_keyword() {
        let verdict = heuristic_verdict("you are stupid");
        assert_eq!(verdict.status, GuardrailStatus::Abuse);
        assert_eq!(heuristic_verdict("I HATE this").status, GuardrailStatus::Abuse);
    }

    #[test]
    fn test_normal_goal_passes() {
        assert_eq!(
            heuristic_verdict("Launch a podcast in three months"),
            GuardrailVerdict::ok("heuristic pass")
        );
    }
}
