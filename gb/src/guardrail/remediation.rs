//! Canned remediation plans for rejected goals
//!
//! Same shape as a generated plan so callers can render them uniformly. The
//! first step quotes the rejection reason.

use crate::domain::{Complexity, GoalPlan, GuardrailStatus, Language};

const GIBBERISH_DEFAULT_REASON: &str = "input could not be interpreted";
const ABUSE_DEFAULT_REASON: &str = "abusive phrasing detected";

/// Five-step plan explaining that the goal looked like noise
pub fn gibberish_plan(language: Language, reason: Option<&str>) -> GoalPlan {
    let detail = detail(reason, GIBBERISH_DEFAULT_REASON);
    let steps = match language {
        Language::En => [
            format!("Signal flagged as noise: {detail}."),
            "Archive the raw payload for operator review.".to_string(),
            "Request a precise objective with verbs, metrics, and timeline.".to_string(),
            "Validate the refreshed brief before re-running Goal_Breaker.".to_string(),
            "Resume standard planning pipeline once clarity achieved.".to_string(),
        ],
        Language::Am => [
            format!("ግብ እንደ ዝምብል ተታይቷል፡ {detail}."),
            "ያልተገባውን ግብ ለመርማሪያ ይመዝግቡ.".to_string(),
            "በግልጽ ግምት እና ክልል ያለ አዲስ ግብ ይጠይቁ.".to_string(),
            "በድጋሜ በፍጻሜ በፊት ግብን ያረጋግጡ.".to_string(),
            "ግልጽነት ከተጠናቀቀ በኋላ መደበኛውን ሂደት ይቀጥሉ.".to_string(),
        ],
    };
    GoalPlan::from_steps(steps, Complexity::minimal())
}

/// Five-step plan explaining that the goal was refused as abusive
pub fn abuse_plan(language: Language, reason: Option<&str>) -> GoalPlan {
    let detail = detail(reason, ABUSE_DEFAULT_REASON);
    let steps = match language {
        Language::En => [
            format!("Channel secured: {detail}."),
            "Suspend tactical generation to protect operators.".to_string(),
            "Issue a professionalism reminder to the requester.".to_string(),
            "Require a respectful, actionable objective before reinstating access.".to_string(),
            "Escalate to human review if hostile input persists.".to_string(),
        ],
        Language::Am => [
            format!("ግንኙነቱ ተደራጀ፤ {detail}."),
            "የታክቲክ ስራ እንዲቆም እርምጃ ይውሰዱ.".to_string(),
            "ለጠየቀው የባለሙያነት ማሳሰቢያ ይላኩ.".to_string(),
            "አክብሮት ያለው ግብ እስኪገባ ድረስ መዳረሻን ያግዱ.".to_string(),
            "ጥልቅ እና ጠበኛ የሆነ ግብ ቢቀጥል ለሰው እንቅስቃሴ ያስገቡ.".to_string(),
        ],
    };
    GoalPlan::from_steps(steps, Complexity::minimal())
}

/// Remediation plan for a rejected status; `None` for `Ok`
pub fn remediation_plan(status: GuardrailStatus, language: Language, reason: Option<&str>) -> Option<GoalPlan> {
    match status {
        GuardrailStatus::Ok => None,
        GuardrailStatus::Gibberish => Some(gibberish_plan(language, reason)),
        GuardrailStatus::Abuse => Some(abuse_plan(language, reason)),
    }
}

fn detail<'a>(reason: Option<&'a str>, default: &'a str) -> &'a str {
    match reason.map(str::trim) {
        Some(r) if !r.is_empty() => r,
        _ => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gibberish_plan_quotes_reason() {
        let plan = gibberish_plan(Language::En, Some("low-information noise"));
        assert_eq!(plan.steps[0], "Signal flagged as noise: low-information noise.");
        assert_eq!(plan.complexity.get(), 1);
    }

    #[test]
    fn test_blank_reason_uses_default() {
        let plan = abuse_plan(Language::En, Some("  "));
        assert_eq!(plan.steps[0], "Channel secured: abusive phrasing detected.");
        let plan = gibberish_plan(Language::Am, None);
        assert!(plan.steps[0].contains("input could not be interpreted"));
    }

    #[test]
    fn test_plans_differ_by_status_and_language() {
        let g_en = gibberish_plan(Language::En, None);
        let a_en = abuse_plan(Language::En, None);
        let a_am = abuse_plan(Language::Am, None);
        assert_ne!(g_en.steps, a_en.steps);
        assert_ne!(a_en.steps, a_am.steps);
        assert!(a_am.steps.iter().all(|s| !s.trim().is_empty()));
    }

    #[test]
    fn test_remediation_plan_for_status() {
        assert!(remediation_plan(GuardrailStatus::Ok, Language::En, None).is_none());
        assert_eq!(
            remediation_plan(GuardrailStatus::Abuse, Language::En, None),
            Some(abuse_plan(Language::En, None))
        );
    }
}
