//! Learning coach coordination core - wiring demonstration.
//!
//! Boots a registry with all six specialists, an orchestrator over it, and
//! runs each of the three named workflows plus a free-text dispatch once so
//! the system can be inspected end to end without a host (HTTP, persistence,
//! ...) around it.

use std::sync::Arc;

use anyhow::Result;
use coach_config::CoachConfig;
use coach_contracts::{Agent, Payload};
use coach_errors::Context;
use coach_orchestrator::Orchestrator;
use coach_registry::AgentRegistry;
use coach_specialists::{
    CurriculumPlannerAgent, ExerciseGeneratorAgent, ProfileAgent, ProgressTrackerAgent, ResourcesAgent, ReviewerAgent,
};
use serde_json::json;
use tracing::info;

fn build_registry() -> Arc<AgentRegistry> {
    let registry = AgentRegistry::new();
    registry.register(Arc::new(ProfileAgent::new()));
    registry.register(Arc::new(CurriculumPlannerAgent::new()));
    registry.register(Arc::new(ExerciseGeneratorAgent::new()));
    registry.register(Arc::new(ReviewerAgent::new()));
    registry.register(Arc::new(ResourcesAgent::new()));
    registry.register(Arc::new(ProgressTrackerAgent::new()));
    Arc::new(registry)
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let config = CoachConfig::load()?;
    info!(enabled_workflows = ?config.workflows.enabled, "loaded configuration");

    let registry = build_registry();
    let orchestrator = Orchestrator::with_min_confidence(registry.clone(), config.router.min_confidence);
    let context = Context::new("demo-learner", "demo-session")?;

    info!("running new_learner_onboarding");
    let onboarding = Payload::for_workflow("new_learner_onboarding")
        .with_field("goals", json!(["closures", "ownership"]))
        .with_field("minutes_per_day", json!(30));
    let result = orchestrator.process(&context, &onboarding).await?;
    info!(?result, "onboarding finished");

    info!("running exercise_submission");
    let submission = Payload::for_workflow("exercise_submission")
        .with_field("task_id", json!("rust-closures-1"))
        .with_field("tests_passed", json!(2))
        .with_field("tests_total", json!(4))
        .with_field("attempt_number", json!(2))
        .with_field("prior_consecutive_failures", json!(1))
        .with_field(
            "plan",
            json!({ "created_at": chrono::Utc::now().to_rfc3339(), "tasks": [] }),
        )
        .with_field("submissions", json!([]));
    let result = orchestrator.process(&context, &submission).await?;
    info!(?result, "exercise submission finished");

    info!("running resource_discovery");
    let discovery = Payload::for_workflow("resource_discovery").with_field("query", json!("rust ownership"));
    let result = orchestrator.process(&context, &discovery).await?;
    info!(?result, "resource discovery finished");

    info!("dispatching free-text message");
    let message = Payload::for_message("I'm stuck, can you give me a hint?");
    let result = orchestrator.process(&context, &message).await?;
    info!(?result, "free-text dispatch finished");

    let health = orchestrator.full_health().await;
    info!(%health, "coordination core health");

    Ok(())
}
