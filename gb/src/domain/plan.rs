//! Plan types: the five-step goal plan and the sub-step expansion
//!
//! Both types enforce their shape at construction, so any value that exists
//! is well-formed. Deserialization goes through the same constructors.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Number of steps in every goal plan
pub const STEP_COUNT: usize = 5;

/// Maximum number of substeps kept from a sub-breakdown
pub const MAX_SUBSTEPS: usize = 3;

/// Lowest allowed complexity score
pub const MIN_COMPLEXITY: u8 = 1;

/// Highest allowed complexity score
pub const MAX_COMPLEXITY: u8 = 10;

/// Ways a decoded payload can violate the plan shape
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("Invalid JSON: {0}")]
    InvalidJson(String),

    #[error("Response is not an object")]
    NotAnObject,

    #[error("Response must include exactly {expected} steps, got {actual}")]
    StepCount { expected: usize, actual: usize },

    #[error("Steps must be a list")]
    StepsNotAList,

    #[error("Step {index} must be a non-empty string")]
    BlankStep { index: usize },

    #[error("Complexity must be an integer between 1 and 10")]
    Complexity,

    #[error("Missing substeps list")]
    MissingSubsteps,
}

/// Complexity self-estimate, always within 1..=10
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct Complexity(u8);

impl Complexity {
    /// Build a complexity score, rejecting anything outside 1..=10
    pub fn new(value: i64) -> Result<Self, SchemaError> {
        if (i64::from(MIN_COMPLEXITY)..=i64::from(MAX_COMPLEXITY)).contains(&value) {
            Ok(Self(value as u8))
        } else {
            debug!(%value, "Complexity::new: out of range");
            Err(SchemaError::Complexity)
        }
    }

    /// Lowest score, used by remediation scripts
    pub const fn minimal() -> Self {
        Self(MIN_COMPLEXITY)
    }

    /// Mid-scale score, used by offline templates
    pub const fn moderate() -> Self {
        Self(5)
    }

    pub fn get(&self) -> u8 {
        self.0
    }
}

impl TryFrom<i64> for Complexity {
    type Error = SchemaError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Complexity> for u8 {
    fn from(c: Complexity) -> Self {
        c.0
    }
}

impl std::fmt::Display for Complexity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Ordered five-step action plan for a goal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawGoalPlan")]
pub struct GoalPlan {
    pub(crate) steps: [String; STEP_COUNT],
    pub(crate) complexity: Complexity,
}

impl GoalPlan {
    /// Build a plan from exactly five non-blank steps
    pub fn new(steps: Vec<String>, complexity: Complexity) -> Result<Self, SchemaError> {
        debug!(step_count = steps.len(), %complexity, "GoalPlan::new: called");
        if let Some(index) = steps.iter().position(|s| s.trim().is_empty()) {
            debug!(%index, "GoalPlan::new: blank step");
            return Err(SchemaError::BlankStep { index });
        }
        let actual = steps.len();
        let steps: [String; STEP_COUNT] = steps.try_into().map_err(|_| SchemaError::StepCount {
            expected: STEP_COUNT,
            actual,
        })?;
        Ok(Self { steps, complexity })
    }

    /// Build a plan from static template text
    pub(crate) fn from_template(steps: [&str; STEP_COUNT], complexity: Complexity) -> Self {
        Self::from_steps(steps.map(str::to_string), complexity)
    }

    /// Build a plan from steps the caller guarantees are non-blank
    pub(crate) fn from_steps(steps: [String; STEP_COUNT], complexity: Complexity) -> Self {
        debug_assert!(steps.iter().all(|s| !s.trim().is_empty()));
        Self { steps, complexity }
    }

    pub fn steps(&self) -> &[String; STEP_COUNT] {
        &self.steps
    }

    pub fn complexity(&self) -> Complexity {
        self.complexity
    }

    pub fn into_steps(self) -> [String; STEP_COUNT] {
        self.steps
    }
}

#[derive(Deserialize)]
struct RawGoalPlan {
    steps: Vec<String>,
    complexity: Complexity,
}

impl TryFrom<RawGoalPlan> for GoalPlan {
    type Error = SchemaError;

    fn try_from(raw: RawGoalPlan) -> Result<Self, Self::Error> {
        Self::new(raw.steps, raw.complexity)
    }
}

/// Tactical expansion of a single step, at most three substeps
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawSubStepPlan")]
pub struct SubStepPlan {
    substeps: Vec<String>,
}

impl SubStepPlan {
    /// Build a sub-plan, keeping only the first three substeps
    pub fn new(mut substeps: Vec<String>) -> Self {
        debug!(substep_count = substeps.len(), "SubStepPlan::new: called");
        substeps.truncate(MAX_SUBSTEPS);
        Self { substeps }
    }

    pub fn substeps(&self) -> &[String] {
        &self.substeps
    }

    pub fn into_substeps(self) -> Vec<String> {
        self.substeps
    }
}

#[derive(Deserialize)]
struct RawSubStepPlan {
    substeps: Vec<String>,
}

impl From<RawSubStepPlan> for SubStepPlan {
    fn from(raw: RawSubStepPlan) -> Self {
        Self::new(raw.substeps)
    }
}
