use std::sync::Arc;
use std::time::Duration;

use coach_contracts::{Agent, AgentType, Intent, Payload};
use coach_errors::{Context, CoreError, ErrorCode};
use coach_orchestrator::Orchestrator;
use coach_registry::AgentRegistry;
use coach_specialists::{
    CurriculumPlannerAgent, ExerciseGeneratorAgent, ProfileAgent, ProgressTrackerAgent, ResourcesAgent, ReviewerAgent,
};
use serde_json::json;

fn context() -> Context {
    Context::new("learner-1", "session-1").unwrap()
}

fn full_registry() -> Arc<AgentRegistry> {
    let registry = AgentRegistry::new();
    registry.register(Arc::new(ProfileAgent::new()));
    registry.register(Arc::new(CurriculumPlannerAgent::new()));
    registry.register(Arc::new(ExerciseGeneratorAgent::new()));
    registry.register(Arc::new(ReviewerAgent::new()));
    registry.register(Arc::new(ResourcesAgent::new()));
    registry.register(Arc::new(ProgressTrackerAgent::new()));
    Arc::new(registry)
}

#[tokio::test]
async fn routing_a_known_intent_counts_exactly_one_breaker_call() {
    let registry = full_registry();
    let orchestrator = Orchestrator::new(registry.clone());
    let payload = Payload::for_intent(Intent::GetProfile);

    orchestrator.process(&context(), &payload).await.unwrap();

    let agent = registry.get(AgentType::Profile).unwrap();
    assert_eq!(agent.health().await.breaker_stats.total_calls, 1);
}

#[tokio::test]
async fn unknown_workflow_name_is_rejected_before_any_step_runs() {
    let orchestrator = Orchestrator::new(full_registry());
    let payload = Payload::for_workflow("not_a_real_workflow");

    let err = orchestrator.process(&context(), &payload).await.unwrap_err();
    assert!(matches!(err, CoreError::UnknownWorkflow { .. }));
}

#[tokio::test]
async fn intent_with_no_registered_agent_surfaces_agent_unavailable() {
    let orchestrator = Orchestrator::new(Arc::new(AgentRegistry::new()));
    let payload = Payload::for_intent(Intent::GetProfile);

    let err = orchestrator.process(&context(), &payload).await.unwrap_err();
    assert!(matches!(err, CoreError::AgentUnavailable { .. }));
}

#[tokio::test]
async fn onboarding_workflow_runs_all_four_steps_in_order() {
    let orchestrator = Orchestrator::new(full_registry());
    let payload = Payload::for_workflow("new_learner_onboarding")
        .with_field("goals", json!(["closures", "ownership"]))
        .with_field("minutes_per_day", json!(45));

    let result = orchestrator.process(&context(), &payload).await.unwrap();
    assert!(result.is_success());
    let data = result.data().unwrap();
    assert_eq!(data["steps_completed"], json!(4));
    assert_eq!(data["outputs"]["1"]["goals"], json!(["closures", "ownership"]));
    assert_eq!(data["outputs"]["2"]["minutes_per_day"], json!(45));
}

#[tokio::test]
async fn onboarding_workflow_aborts_on_the_failing_step_and_keeps_partial_outputs() {
    let orchestrator = Orchestrator::new(full_registry());
    // no "goals" field: update_goals (step 1) rejects an empty list and the
    // default on_failure policy (Abort) stops the workflow there.
    let payload = Payload::for_workflow("new_learner_onboarding");

    let result = orchestrator.process(&context(), &payload).await.unwrap();
    assert!(!result.is_success());
    assert_eq!(result.metadata().get("workflow_step"), Some(&json!(1)));
    assert!(result.metadata().contains_key("partial_outputs"));
}

#[tokio::test]
async fn exercise_submission_workflow_adapts_difficulty_after_consecutive_failures() {
    let orchestrator = Orchestrator::new(full_registry());
    let payload = Payload::for_workflow("exercise_submission")
        .with_field("task_id", json!("task-9"))
        .with_field("tests_passed", json!(0))
        .with_field("tests_total", json!(4))
        .with_field("attempt_number", json!(3))
        .with_field("prior_consecutive_failures", json!(2))
        .with_field("plan", json!({
            "created_at": chrono::Utc::now().to_rfc3339(),
            "tasks": [],
        }))
        .with_field("submissions", json!([
            {"task_id": "task-7", "passed": false, "submitted_at": chrono::Utc::now().to_rfc3339()},
            {"task_id": "task-8", "passed": false, "submitted_at": chrono::Utc::now().to_rfc3339()},
            {"task_id": "task-9", "passed": false, "submitted_at": chrono::Utc::now().to_rfc3339()},
        ]));

    let result = orchestrator.process(&context(), &payload).await.unwrap();
    assert!(result.is_success());
    let data = result.data().unwrap();
    assert_eq!(data["steps_completed"], json!(4));
    assert_eq!(data["outputs"]["3"]["difficulty_delta"], json!(-1));
}

#[tokio::test]
async fn exercise_submission_workflow_skips_adaptation_when_no_triggers_detected() {
    let orchestrator = Orchestrator::new(full_registry());
    let payload = Payload::for_workflow("exercise_submission")
        .with_field("task_id", json!("task-1"))
        .with_field("tests_passed", json!(4))
        .with_field("tests_total", json!(4))
        .with_field("attempt_number", json!(1))
        .with_field("prior_consecutive_failures", json!(0))
        .with_field("plan", json!({
            "created_at": chrono::Utc::now().to_rfc3339(),
            "tasks": [],
        }))
        .with_field("submissions", json!([]));

    let result = orchestrator.process(&context(), &payload).await.unwrap();
    assert!(result.is_success());
    let data = result.data().unwrap();
    // the fourth step (adapt_difficulty) was skipped by run_if, so its
    // recorded output is null rather than a difficulty_delta.
    assert_eq!(data["outputs"]["3"], serde_json::Value::Null);
}

#[tokio::test]
async fn resource_discovery_workflow_runs_search_verify_recommend_in_order() {
    let orchestrator = Orchestrator::new(full_registry());
    let payload = Payload::for_workflow("resource_discovery")
        .with_field("query", json!("rust ownership"))
        .with_field("candidates", json!([
            {"url": "https://example.com/a", "relevance": 0.9},
            {"url": "https://example.com/b", "relevance": 0.4},
        ]));

    let result = orchestrator.process(&context(), &payload).await.unwrap();
    assert!(result.is_success());
    let data = result.data().unwrap();
    assert_eq!(data["steps_completed"], json!(3));
    assert_eq!(data["outputs"]["1"]["verified"].as_array().unwrap().len(), 2);
    assert_eq!(data["outputs"]["2"]["recommendations"][0]["url"], json!("https://example.com/a"));
}

#[tokio::test]
async fn free_text_below_confidence_threshold_asks_for_clarification() {
    let orchestrator = Orchestrator::new(full_registry());
    let payload = Payload::for_message("hmm");

    let result = orchestrator.process(&context(), &payload).await.unwrap();
    assert!(result.is_success());
    assert_eq!(result.data().unwrap()["needs_clarification"], json!(true));
}

#[tokio::test]
async fn clear_free_text_message_is_classified_and_routed() {
    let orchestrator = Orchestrator::new(full_registry());
    let payload = Payload::for_message("I'm stuck, can you give me a hint?");

    let result = orchestrator.process(&context(), &payload).await.unwrap();
    assert!(result.is_success());
}

#[tokio::test]
async fn breaker_opens_after_repeated_timeouts_and_short_circuits_further_calls() {
    struct AlwaysSlow {
        breaker: coach_resilience::CircuitBreaker,
    }

    #[async_trait::async_trait]
    impl Agent for AlwaysSlow {
        fn agent_type(&self) -> AgentType {
            AgentType::Profile
        }

        fn supported_intents(&self) -> std::collections::HashSet<Intent> {
            std::collections::HashSet::from([Intent::GetProfile])
        }

        async fn process(
            &self,
            _context: &Context,
            _payload: &Payload,
        ) -> Result<coach_errors::AgentResult, CoreError> {
            tokio::time::sleep(Duration::from_millis(200)).await;
            Ok(coach_errors::AgentResult::success(json!({})))
        }

        fn breaker(&self) -> &coach_resilience::CircuitBreaker {
            &self.breaker
        }
    }

    let registry = AgentRegistry::new();
    registry.register(Arc::new(AlwaysSlow {
        breaker: coach_resilience::CircuitBreaker::new(coach_resilience::CircuitBreakerConfig {
            name: "slow-profile".to_string(),
            failure_threshold: 2,
            recovery_timeout: Duration::from_secs(60),
            success_threshold: 1,
            default_timeout: Duration::from_millis(10),
        }),
    }));
    let registry = Arc::new(registry);
    let orchestrator = Orchestrator::new(registry.clone());
    let payload = Payload::for_intent(Intent::GetProfile);

    for _ in 0..2 {
        let result = orchestrator.process(&context(), &payload).await.unwrap();
        assert_eq!(result.metadata().get("fallback"), None);
        assert!(!result.is_success());
    }

    let third = orchestrator.process(&context(), &payload).await.unwrap();
    match third {
        coach_errors::AgentResult::Error { error_code, .. } => assert_eq!(error_code, ErrorCode::CircuitOpen),
        _ => panic!("expected the breaker to be open"),
    }
}
