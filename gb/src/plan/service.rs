//! Plan service
//!
//! Owns the model client, prompt loader, chain orchestrator, guardrail
//! classifier and memoization caches. Generation never fails once the input is
//! known to be non-blank: every downstream problem degrades to an offline plan.

use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, error, info};

use super::cache::{CacheStats, LruCache};
use super::chain::{ChainOrchestrator, ModelChain};
use super::fallback::{offline_plan, offline_sub_plan};
use super::invoker::{ModelInvoker, RetryPolicy};
use super::validate::{parse_breakdown, parse_sub_breakdown};
use crate::config::Config;
use crate::domain::{GoalPlan, GuardrailVerdict, Language, SubStepPlan};
use crate::guardrail::{self, GuardrailClassifier};
use crate::llm::{self, GenerationConfig, GenerativeClient, LlmError};
use crate::prompts::{PromptError, PromptLoader};

/// Errors surfaced to callers of the plan service
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PlanError {
    #[error("Input text is empty")]
    EmptyInput,
}

type CacheKey = (String, Language);

/// Guardrail verdict together with the plan it led to
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GatedPlan {
    pub verdict: GuardrailVerdict,
    pub plan: GoalPlan,
}

impl GatedPlan {
    /// True when the goal passed the guardrail and the plan is a real breakdown
    pub fn is_accepted(&self) -> bool {
        self.verdict.status.is_ok()
    }
}

/// Cache counters for both memoized operations
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ServiceCacheStats {
    pub breakdown: CacheStats,
    pub sub_breakdown: CacheStats,
}

/// Goal planning entry point
pub struct PlanService {
    offline: bool,
    prompts: Arc<PromptLoader>,
    orchestrator: ChainOrchestrator,
    guardrail: GuardrailClassifier,
    breakdown_cache: LruCache<CacheKey, GoalPlan>,
    sub_breakdown_cache: LruCache<CacheKey, SubStepPlan>,
}

impl PlanService {
    /// Build a service, creating the model client from config
    ///
    /// A missing API key is not an error; the service runs offline.
    pub fn from_config(config: &Config) -> Result<Self, LlmError> {
        debug!("PlanService::from_config: called");
        let client = llm::create_client(&config.llm)?;
        Ok(Self::new(config, client))
    }

    /// Build a service around an existing client (`None` for offline mode)
    pub fn new(config: &Config, client: Option<Arc<dyn GenerativeClient>>) -> Self {
        let offline = client.is_none();
        debug!(offline, "PlanService::new: called");

        let prompts = Arc::new(PromptLoader::new(config.prompts.dir.as_ref()));
        let invoker = client
            .clone()
            .map(|c| ModelInvoker::new(c, RetryPolicy::from_config(&config.retry)));
        let orchestrator = ChainOrchestrator::new(
            invoker,
            ModelChain::from_config(&config.llm),
            GenerationConfig::json(config.llm.temperature, config.llm.max_output_tokens),
        );
        let guardrail = GuardrailClassifier::new(client, config.llm.guardrail_model.clone(), prompts.clone());

        info!(
            offline,
            models = ?orchestrator.chain().models(),
            guardrail_model = %guardrail.model(),
            "Plan service ready"
        );

        Self {
            offline,
            prompts,
            orchestrator,
            guardrail,
            breakdown_cache: LruCache::new(config.cache.breakdown_capacity),
            sub_breakdown_cache: LruCache::new(config.cache.sub_breakdown_capacity),
        }
    }

    pub fn is_offline(&self) -> bool {
        self.offline
    }

    /// Label a goal as ok, gibberish or abuse
    pub async fn classify_goal(&self, goal: &str) -> GuardrailVerdict {
        self.guardrail.classify(goal).await
    }

    /// Five-step plan for a goal
    ///
    /// Only blank input is an error. The returned plan is a copy; mutating it
    /// does not affect later calls.
    pub async fn generate_breakdown(&self, goal: &str, language: impl Into<Language>) -> Result<GoalPlan, PlanError> {
        let language = language.into();
        let goal = goal.trim();
        debug!(goal_len = goal.len(), %language, "generate_breakdown: called");
        if goal.is_empty() {
            return Err(PlanError::EmptyInput);
        }

        let key = (goal.to_string(), language);
        if let Some(plan) = self.breakdown_cache.get(&key) {
            debug!("generate_breakdown: cache hit");
            return Ok(plan);
        }

        let plan = match self.prompts.breakdown_prompt(goal, language) {
            Ok(prompt) => {
                self.orchestrator
                    .run(
                        &prompt,
                        |payload| parse_breakdown(payload, goal, language),
                        || offline_plan(goal, language),
                    )
                    .await
            }
            Err(PromptError::EmptyInput) => return Err(PlanError::EmptyInput),
            Err(e) => {
                error!(error = %e, "Failed to build breakdown prompt, using offline plan");
                offline_plan(goal, language)
            }
        };

        self.breakdown_cache.insert(key, plan.clone());
        Ok(plan)
    }

    /// Up to three sub-steps for a single step
    pub async fn generate_sub_breakdown(
        &self,
        step: &str,
        language: impl Into<Language>,
    ) -> Result<SubStepPlan, PlanError> {
        let language = language.into();
        let step = step.trim();
        debug!(step_len = step.len(), %language, "generate_sub_breakdown: called");
        if step.is_empty() {
            return Err(PlanError::EmptyInput);
        }

        let key = (step.to_string(), language);
        if let Some(plan) = self.sub_breakdown_cache.get(&key) {
            debug!("generate_sub_breakdown: cache hit");
            return Ok(plan);
        }

        let plan = match self.prompts.sub_breakdown_prompt(step, language) {
            Ok(prompt) => {
                self.orchestrator
                    .run(
                        &prompt,
                        |payload| parse_sub_breakdown(payload, step, language),
                        || offline_sub_plan(step, language),
                    )
                    .await
            }
            Err(PromptError::EmptyInput) => return Err(PlanError::EmptyInput),
            Err(e) => {
                error!(error = %e, "Failed to build sub-breakdown prompt, using offline sub-plan");
                offline_sub_plan(step, language)
            }
        };

        self.sub_breakdown_cache.insert(key, plan.clone());
        Ok(plan)
    }

    pub fn gibberish_plan(&self, language: impl Into<Language>, reason: Option<&str>) -> GoalPlan {
        guardrail::gibberish_plan(language.into(), reason)
    }

    pub fn abuse_plan(&self, language: impl Into<Language>, reason: Option<&str>) -> GoalPlan {
        guardrail::abuse_plan(language.into(), reason)
    }

    /// Classify a goal, then either break it down or hand back a remediation plan
    pub async fn plan_goal(&self, goal: &str, language: impl Into<Language>) -> GatedPlan {
        let language = language.into();
        let verdict = self.classify_goal(goal).await;
        debug!(status = %verdict.status, "plan_goal: classified");

        if let Some(plan) = guardrail::remediation_plan(verdict.status, language, Some(verdict.reason.as_str())) {
            info!(status = %verdict.status, reason = %verdict.reason, "Goal rejected by guardrail");
            return GatedPlan { verdict, plan };
        }

        let plan = match self.generate_breakdown(goal, language).await {
            Ok(plan) => plan,
            // Unreachable in practice: blank goals are classified as gibberish
            Err(PlanError::EmptyInput) => guardrail::gibberish_plan(language, Some("empty input")),
        };
        GatedPlan { verdict, plan }
    }

    pub fn cache_stats(&self) -> ServiceCacheStats {
        ServiceCacheStats {
            breakdown: self.breakdown_cache.stats(),
            sub_breakdown: self.sub_breakdown_cache.stats(),
        }
    }

    /// Drop every memoized plan
    pub fn clear_caches(&self) {
        debug!("clear_caches: called");
        self.breakdown_cache.clear();
        self.sub_breakdown_cache.clear();
    }
}
