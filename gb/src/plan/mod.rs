//! Plan generation pipeline
//!
//! Prompt → model chain (with rate-limit retries per model) → schema
//! validation → memoization, with deterministic offline plans standing in
//! whenever a model cannot deliver.

pub mod cache;
pub mod chain;
pub mod fallback;
pub mod invoker;
mod service;
pub mod validate;

pub use cache::{CacheStats, LruCache};
pub use chain::{ChainOrchestrator, ModelChain};
pub use fallback::{PlanTemplate, offline_plan, offline_sub_plan};
pub use invoker::{MAX_JITTER, ModelInvoker, RetryPolicy};
pub use service::{GatedPlan, PlanError, PlanService, ServiceCacheStats};
pub use validate::{parse_breakdown, parse_sub_breakdown, validate_breakdown, validate_sub_breakdown};
