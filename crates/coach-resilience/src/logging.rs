//! Correlated structured logging.
//!
//! Every event emitted through the envelope carries the request's
//! correlation id so a failure can be traced through a workflow across
//! several agents. Built on `tracing`; this module only shapes the fields,
//! it does not configure a subscriber (the host does that).

use std::collections::HashMap;

use serde_json::Value;
use tracing::{debug, error, info, warn};

/// A logger scoped to one component (an agent type, the orchestrator, ...)
/// that stamps every event with the request's correlation id.
#[derive(Debug, Clone)]
pub struct CorrelatedLogger {
    component: String,
}

impl CorrelatedLogger {
    pub fn new(component: impl Into<String>) -> Self {
        Self {
            component: component.into(),
        }
    }

    pub fn operation_start(&self, correlation_id: &str, operation: &str) {
        info!(
            component = %self.component,
            correlation_id = %correlation_id,
            operation = %operation,
            "operation started"
        );
    }

    pub fn operation_complete(&self, correlation_id: &str, operation: &str, duration_ms: u64, success: bool) {
        info!(
            component = %self.component,
            correlation_id = %correlation_id,
            operation = %operation,
            duration_ms,
            success,
            "operation completed"
        );
    }

    pub fn fallback_used(&self, correlation_id: &str, operation: &str, reason: &str) {
        warn!(
            component = %self.component,
            correlation_id = %correlation_id,
            operation = %operation,
            reason = %reason,
            "fallback used"
        );
    }

    pub fn warning(&self, correlation_id: &str, message: &str) {
        warn!(component = %self.component, correlation_id = %correlation_id, "{}", message);
    }

    pub fn error(&self, correlation_id: &str, operation: &str, message: &str, metadata: &HashMap<String, Value>) {
        error!(
            component = %self.component,
            correlation_id = %correlation_id,
            operation = %operation,
            metadata = %serde_json::to_string(metadata).unwrap_or_default(),
            "{}",
            message
        );
    }

    pub fn debug(&self, correlation_id: &str, message: &str) {
        debug!(component = %self.component, correlation_id = %correlation_id, "{}", message);
    }
}
