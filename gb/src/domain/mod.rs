//! Domain types for GoalBreaker
//!
//! Plans, languages and guardrail verdicts. Plan types validate their own
//! shape, so the rest of the crate can pass them around without re-checking.

mod language;
mod plan;
mod verdict;

pub use language::Language;
pub use plan::{
    Complexity, GoalPlan, MAX_COMPLEXITY, MAX_SUBSTEPS, MIN_COMPLEXITY, STEP_COUNT, SchemaError, SubStepPlan,
};
pub use verdict::{GuardrailStatus, GuardrailVerdict};
