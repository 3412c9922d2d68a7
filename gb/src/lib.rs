//! GoalBreaker - resilient goal-to-plan generation
//!
//! Turns a free-text goal into an ordered five-step plan (and a single step
//! into up to three sub-steps) by calling a hosted generative model, with
//! deterministic offline plans whenever the model is unavailable or its output
//! is malformed.
//!
//! # Core Concepts
//!
//! - **Model chain**: candidate models are tried in priority order, one at a time
//! - **Rate-limit retry**: only quota failures are retried, with exponential backoff
//! - **Strict validation**: payloads that do not match the plan schema are discarded
//! - **Memoization**: plans are cached per (text, language) and handed out as copies
//! - **Guardrail**: gibberish and abusive goals get a remediation plan instead
//!
//! # Modules
//!
//! - [`llm`] - Generation client trait and Gemini implementation
//! - [`prompts`] - Prompt templates
//! - [`plan`] - Invoker, chain orchestrator, validation, fallbacks, caching
//! - [`guardrail`] - Goal classification and remediation plans
//! - [`history`] - Recently generated plans
//! - [`config`] - Configuration types and loading
//! - [`cli`] - Command-line interface

pub mod cli;
pub mod config;
pub mod domain;
pub mod guardrail;
pub mod history;
pub mod llm;
pub mod plan;
pub mod prompts;

// Re-export commonly used types
pub use config::{Config, LlmConfig};
pub use domain::{Complexity, GoalPlan, GuardrailStatus, GuardrailVerdict, Language, SchemaError, SubStepPlan};
pub use history::{HistoryEntry, HistoryError, HistoryStore};
pub use llm::{GeminiClient, GenerateResponse, GenerationRequest, GenerativeClient, LlmError, create_client};
pub use plan::{GatedPlan, PlanError, PlanService};
pub use prompts::{PromptError, PromptLoader};
