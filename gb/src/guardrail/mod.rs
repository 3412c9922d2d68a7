//! Guardrail classifier
//!
//! Pre-generation content filter: labels a goal as ok, gibberish or abuse,
//! either through a lightweight model call or a local heuristic, and supplies
//! remediation plans for rejected goals.

mod classifier;
mod heuristic;
mod remediation;

pub use classifier::{GUARDRAIL_ERROR_REASON, GuardrailClassifier, STATUS_PREFIXES, normalize_status};
pub use heuristic::{ABUSIVE_TOKENS, heuristic_verdict};
pub use remediation::{abuse_plan, gibberish_plan, remediation_plan};
