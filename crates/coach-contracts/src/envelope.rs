//! The protection envelope every call into an agent passes through.
//!
//! Order: validate context → validate payload → run under the circuit
//! breaker with a timeout → on timeout or error, give the agent a chance to
//! supply a fallback before giving up. Validation failures never touch the
//! breaker — a caller that sends a malformed request should not be able to
//! trip an agent's circuit.

use std::time::Instant;

use coach_errors::{AgentResult, Context, CoreError, ErrorCode};
use coach_resilience::{BreakerError, CorrelatedLogger};

use crate::agent::Agent;
use crate::payload::Payload;

pub async fn execute_with_protection(
    agent: &dyn Agent,
    context: &Context,
    payload: &Payload,
    logger: &CorrelatedLogger,
) -> AgentResult {
    let operation = payload
        .intent
        .map(|i| i.to_string())
        .or_else(|| payload.workflow.clone())
        .unwrap_or_else(|| "message".to_string());

    if context.user_id.is_empty() || context.session_id.is_empty() {
        let err = CoreError::validation("context.user_id and context.session_id must be non-empty");
        logger.warning(&context.correlation_id, &err.to_string());
        return err.into();
    }

    if let Err(err) = agent.validate_payload(payload) {
        logger.warning(&context.correlation_id, &err.to_string());
        return err.into();
    }

    logger.operation_start(&context.correlation_id, &operation);
    let started = Instant::now();
    let timeout = payload.timeout.unwrap_or_else(|| agent.default_timeout());

    let outcome = agent
        .breaker()
        .call_exempting(timeout, || agent.process(context, payload), CoreError::is_validation)
        .await;

    let elapsed_ms = started.elapsed().as_millis() as u64;

    match outcome {
        Ok(result) => {
            logger.operation_complete(&context.correlation_id, &operation, elapsed_ms, true);
            result
        }
        Err(BreakerError::Open { name }) => {
            logger.operation_complete(&context.correlation_id, &operation, elapsed_ms, false);
            AgentResult::error(
                format!("circuit breaker '{name}' is open"),
                ErrorCode::CircuitOpen,
            )
        }
        Err(BreakerError::Timeout { duration_ms }) => {
            logger.operation_complete(&context.correlation_id, &operation, elapsed_ms, false);
            if let Some(fallback) = agent.on_timeout(context, payload).await {
                logger.fallback_used(&context.correlation_id, &operation, "timeout");
                fallback.with_metadata_entry("fallback", serde_json::json!(true))
            } else {
                AgentResult::error(
                    format!("operation '{operation}' timed out after {duration_ms}ms"),
                    ErrorCode::Timeout,
                )
            }
        }
        Err(BreakerError::Inner(core_err)) => {
            logger.operation_complete(&context.correlation_id, &operation, elapsed_ms, false);
            if core_err.is_validation() {
                return core_err.into();
            }
            if let Some(fallback) = agent.on_error(context, payload, &core_err).await {
                logger.fallback_used(&context.correlation_id, &operation, &core_err.to_string());
                fallback.with_metadata_entry("fallback", serde_json::json!(true))
            } else {
                core_err.into()
            }
        }
    }
}
