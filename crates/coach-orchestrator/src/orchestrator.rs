//! The orchestrator: itself an `Agent`, so it inherits the protection
//! envelope. Decides between three dispatch modes and runs the declarative
//! workflow engine.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use coach_contracts::{execute_with_protection, Agent, AgentType, Intent, Payload};
use coach_errors::{AgentResult, Context, CoreError, ErrorCode};
use coach_registry::AgentRegistry;
use coach_resilience::{CircuitBreaker, CircuitBreakerConfig, CorrelatedLogger};
use coach_router::{classify, route_intent};
use serde_json::json;
use tracing::info;

use crate::workflow::{self, OnFailure, Workflow};

pub struct Orchestrator {
    registry: Arc<AgentRegistry>,
    breaker: CircuitBreaker,
    logger: CorrelatedLogger,
    min_confidence: f64,
}

impl Orchestrator {
    pub fn new(registry: Arc<AgentRegistry>) -> Self {
        Self::with_min_confidence(registry, 0.3)
    }

    pub fn with_min_confidence(registry: Arc<AgentRegistry>, min_confidence: f64) -> Self {
        Self {
            registry,
            breaker: CircuitBreaker::new(CircuitBreakerConfig {
                name: "orchestrator".to_string(),
                ..CircuitBreakerConfig::default()
            }),
            logger: CorrelatedLogger::new("orchestrator"),
            min_confidence,
        }
    }

    pub fn registry(&self) -> &Arc<AgentRegistry> {
        &self.registry
    }

    /// `{registered_agents, available_workflows, per-breaker stats}` — the
    /// orchestrator's own entry point for operational visibility, separate
    /// from `Agent::health()` (which reports only this breaker).
    pub async fn full_health(&self) -> serde_json::Value {
        let mut per_agent = Vec::new();
        for agent in self.registry.all_agents() {
            per_agent.push(agent.health().await);
        }
        json!({
            "registered_agents": self.registry.registered_types().iter().map(|t| t.to_string()).collect::<Vec<_>>(),
            "available_workflows": workflow::CATALOG.iter().map(|w| w.name).collect::<Vec<_>>(),
            "agent_health": per_agent,
            "orchestrator_breaker": self.breaker.stats().await,
        })
    }

    async fn dispatch_intent(&self, intent: Intent, context: &Context, payload: &Payload) -> AgentResult {
        let agent_type = route_intent(intent);
        let Some(agent) = self.registry.get(agent_type) else {
            return CoreError::AgentUnavailable { agent_type: agent_type.to_string() }.into();
        };
        execute_with_protection(agent.as_ref(), context, payload, &self.logger).await
    }

    async fn dispatch(&self, context: &Context, payload: &Payload) -> Result<AgentResult, CoreError> {
        if let Some(workflow_name) = &payload.workflow {
            let Some(wf) = workflow::find(workflow_name) else {
                return Err(CoreError::UnknownWorkflow { name: workflow_name.clone() });
            };
            return Ok(self.run_workflow(wf, context, payload).await);
        }

        if let Some(intent) = payload.intent {
            return Ok(self.dispatch_intent(intent, context, payload).await);
        }

        if let Some(message) = &payload.message {
            let classification = classify(message);
            let (Some(intent), Some(_target)) = (classification.intent, classification.target_agent) else {
                return Ok(AgentResult::success(json!({
                    "needs_clarification": true,
                    "alternatives": [],
                })));
            };
            if classification.confidence < self.min_confidence {
                let alternatives: Vec<_> = classification
                    .alternative_intents
                    .iter()
                    .map(|(i, score)| json!({"intent": i.to_string(), "score": score}))
                    .collect();
                return Ok(AgentResult::success(json!({
                    "needs_clarification": true,
                    "top_guess": intent.to_string(),
                    "confidence": classification.confidence,
                    "alternatives": alternatives,
                })));
            }
            let mut rewritten = payload.clone();
            rewritten.intent = Some(intent);
            rewritten.message = None;
            return Box::pin(self.dispatch(context, &rewritten)).await;
        }

        Err(CoreError::validation("payload must set workflow, intent, or message"))
    }

    async fn run_workflow(&self, wf: &Workflow, context: &Context, incoming: &Payload) -> AgentResult {
        let mut prior_outputs: Vec<Option<AgentResult>> = Vec::with_capacity(wf.steps.len());

        for (index, step) in wf.steps.iter().enumerate() {
            if let Some(predicate) = step.run_if {
                if !predicate(&prior_outputs) {
                    info!(workflow = wf.name, step = index, "workflow step skipped");
                    prior_outputs.push(None);
                    continue;
                }
            }

            let step_payload = if let Some(transform) = step.payload_transform {
                transform(context, incoming, &prior_outputs)
            } else {
                let mut p = incoming.clone();
                p.intent = Some(step.intent);
                p
            };
            let step_payload = match step.timeout {
                Some(t) => step_payload.with_timeout(t),
                None => step_payload,
            };

            let Some(agent) = self.registry.get(step.agent_type) else {
                let err = AgentResult::error(
                    format!("agent '{}' is not registered for workflow step {index}", step.agent_type),
                    ErrorCode::AgentUnavailable,
                );
                match self.handle_step_failure(step.on_failure, context, &step_payload, index, &mut prior_outputs, err).await {
                    Some(aborted) => return aborted,
                    None => continue,
                }
            };

            let result = execute_with_protection(agent.as_ref(), context, &step_payload, &self.logger).await;

            if !result.is_success() {
                match self.handle_step_failure(step.on_failure, context, &step_payload, index, &mut prior_outputs, result).await {
                    Some(aborted) => return aborted,
                    None => continue,
                }
            }

            prior_outputs.push(Some(result));
        }

        let final_outputs: serde_json::Map<String, serde_json::Value> = prior_outputs
            .iter()
            .enumerate()
            .map(|(i, _)| (i.to_string(), workflow::prior_data(&prior_outputs, i)))
            .collect();

        let next_actions = prior_outputs
            .iter()
            .rev()
            .find_map(|r| r.as_ref())
            .map(|r| r.next_actions().to_vec())
            .unwrap_or_default();

        AgentResult::success_with(
            json!({
                "workflow_name": wf.name,
                "steps_completed": prior_outputs.len(),
                "outputs": final_outputs,
            }),
            next_actions,
            Default::default(),
        )
    }

    /// Applies a step's `on_failure` policy. Returns `Some(result)` when
    /// the workflow must stop immediately (Abort), `None` when the caller
    /// should push a recorded output and continue.
    async fn handle_step_failure(
        &self,
        policy: OnFailure,
        context: &Context,
        step_payload: &Payload,
        index: usize,
        prior_outputs: &mut Vec<Option<AgentResult>>,
        failure: AgentResult,
    ) -> Option<AgentResult> {
        match policy {
            OnFailure::Abort => {
                let partial: serde_json::Map<String, serde_json::Value> = prior_outputs
                    .iter()
                    .enumerate()
                    .map(|(i, _)| (i.to_string(), workflow::prior_data(prior_outputs, i)))
                    .collect();
                let error_message = match &failure {
                    AgentResult::Error { error, .. } => error.clone(),
                    _ => "workflow step failed".to_string(),
                };
                Some(
                    AgentResult::error(error_message, ErrorCode::ProcessingError)
                        .with_metadata_entry("workflow_step", json!(index))
                        .with_metadata_entry("partial_outputs", json!(partial)),
                )
            }
            OnFailure::Continue => {
                prior_outputs.push(Some(failure));
                None
            }
            OnFailure::Fallback(fallback_intent) => {
                let mut fallback_payload = step_payload.clone();
                fallback_payload.intent = Some(fallback_intent);
                let fallback_result = self.dispatch_intent(fallback_intent, context, &fallback_payload).await;
                prior_outputs.push(Some(fallback_result));
                None
            }
        }
    }
}

#[async_trait]
impl Agent for Orchestrator {
    fn agent_type(&self) -> AgentType {
        AgentType::Orchestrator
    }

    /// The union of every enumerated intent, plus acceptance of
    /// workflow/message-only payloads handled by `validate_payload`.
    fn supported_intents(&self) -> HashSet<Intent> {
        Intent::ALL.iter().copied().collect()
    }

    fn validate_payload(&self, payload: &Payload) -> Result<(), CoreError> {
        if payload.workflow.is_some() || payload.intent.is_some() || payload.message.is_some() {
            Ok(())
        } else {
            Err(CoreError::validation("payload must set one of workflow, intent, or message"))
        }
    }

    async fn process(&self, context: &Context, payload: &Payload) -> Result<AgentResult, CoreError> {
        self.dispatch(context, payload).await
    }

    fn breaker(&self) -> &CircuitBreaker {
        &self.breaker
    }
}
