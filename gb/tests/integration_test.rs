//! Integration tests for GoalBreaker
//!
//! These tests drive the public API end to end: the plan service against a
//! scripted client, the Gemini client against a local mock server, and the
//! offline paths.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use goalbreaker::config::Config;
use goalbreaker::domain::{GuardrailStatus, Language, STEP_COUNT};
use goalbreaker::llm::{GeminiClient, GenerateResponse, GenerationRequest, GenerativeClient, LlmError};
use goalbreaker::plan::{PlanService, offline_plan, validate_sub_breakdown};
use proptest::prelude::*;

/// Client that rate-limits the first `failures` calls, then answers with `body`
struct FlakyClient {
    failures: usize,
    body: String,
    calls: AtomicUsize,
}

impl FlakyClient {
    fn new(failures: usize, body: serde_json::Value) -> Self {
        Self {
            failures,
            body: body.to_string(),
            calls: AtomicUsize::new(0),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl GenerativeClient for FlakyClient {
    async fn generate(&self, _request: GenerationRequest) -> Result<GenerateResponse, LlmError> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        if n < self.failures {
            return Err(LlmError::RateLimited {
                message: "RESOURCE_EXHAUSTED".to_string(),
            });
        }
        Ok(GenerateResponse::from_text(self.body.clone()))
    }
}

fn fast_config(models: &[&str]) -> Config {
    let mut config = Config::default();
    config.llm.model_chain = models.iter().map(|m| m.to_string()).collect();
    config.retry.base_delay_ms = 1;
    config
}

// =============================================================================
// Plan service
// =============================================================================

#[tokio::test]
async fn test_rate_limited_model_recovers_within_retry_budget() {
    let client = Arc::new(FlakyClient::new(
        2,
        serde_json::json!({"steps": ["a", "b", "c", "d", "e"], "complexity": 3}),
    ));
    let service = PlanService::new(&fast_config(&["only"]), Some(client.clone()));

    let plan = service.generate_breakdown("Open a bakery", Language::En).await.unwrap();

    assert_eq!(plan.steps()[0], "a");
    assert_eq!(plan.complexity().get(), 3);
    assert_eq!(client.calls(), 3);
}

#[tokio::test]
async fn test_rate_limit_beyond_budget_falls_back_offline() {
    let client = Arc::new(FlakyClient::new(usize::MAX, serde_json::json!({})));
    let service = PlanService::new(&fast_config(&["only"]), Some(client.clone()));

    let plan = service.generate_breakdown("Deploy the API", Language::Am).await.unwrap();

    assert_eq!(plan, offline_plan("Deploy the API", Language::Am));
    assert_eq!(client.calls(), 3);
}

#[tokio::test]
async fn test_offline_service_never_fails_for_real_goals() {
    let service = PlanService::new(&Config::default(), None);

    for goal in ["Research battery chemistry", "Launch v2", "Learn the cello"] {
        let plan = service.generate_breakdown(goal, "am").await.unwrap();
        assert_eq!(plan.steps().len(), STEP_COUNT);
        let sub = service.generate_sub_breakdown(&plan.steps()[0], "am").await.unwrap();
        assert_eq!(sub.substeps().len(), 3);
    }
}

#[tokio::test]
async fn test_gated_flow_offline() {
    let service = PlanService::new(&Config::default(), None);

    let noise = service.plan_goal("zzzzzzzzzzzzzzzzzz", Language::En).await;
    assert_eq!(noise.verdict.status, GuardrailStatus::Gibberish);
    assert_eq!(noise.plan.steps()[0], "Signal flagged as noise: low-information noise.");

    let fine = service.plan_goal("Research the market", Language::En).await;
    assert!(fine.is_accepted());
    assert_eq!(fine.plan, offline_plan("Research the market", Language::En));
}

// =============================================================================
// Gemini client over HTTP
// =============================================================================

#[tokio::test]
async fn test_gemini_chain_over_http() {
    let mut server = mockito::Server::new_async().await;
    let limited = server
        .mock("POST", "/v1beta/models/first:generateContent")
        .with_status(429)
        .with_body(r#"{"error":{"status":"RESOURCE_EXHAUSTED"}}"#)
        .expect(3)
        .create_async()
        .await;
    let ok = server
        .mock("POST", "/v1beta/models/second:generateContent")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            serde_json::json!({
                "candidates": [{
                    "content": {"parts": [{"text": "{\"steps\":[\"1\",\"2\",\"3\",\"4\",\"5\"],\"complexity\":9}"}]}
                }]
            })
            .to_string(),
        )
        .expect(1)
        .create_async()
        .await;

    let mut config = fast_config(&["first", "second"]);
    config.llm.base_url = server.url();
    let client = GeminiClient::from_config(&config.llm, "test-key".to_string()).unwrap();
    let service = PlanService::new(&config, Some(Arc::new(client)));

    let plan = service.generate_breakdown("Write a thesis", Language::En).await.unwrap();

    assert_eq!(plan.steps()[4], "5");
    assert_eq!(plan.complexity().get(), 9);
    limited.assert_async().await;
    ok.assert_async().await;
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    #[test]
    fn prop_offline_plan_always_has_five_steps(goal in "\\PC{1,80}", am in any::<bool>()) {
        let language = if am { Language::Am } else { Language::En };
        let plan = offline_plan(&goal, language);
        prop_assert_eq!(plan.steps().len(), STEP_COUNT);
        prop_assert!(plan.steps().iter().all(|s| !s.trim().is_empty()));
        prop_assert_eq!(plan.complexity().get(), 5);
    }

    #[test]
    fn prop_substeps_never_exceed_three(items in proptest::collection::vec("[a-z ]{0,20}", 0..10)) {
        let payload = serde_json::json!({"substeps": items}).to_string();
        let plan = validate_sub_breakdown(&payload).unwrap();
        prop_assert!(plan.substeps().len() <= 3);
        prop_assert_eq!(plan.substeps().len(), items.len().min(3));
    }
}
