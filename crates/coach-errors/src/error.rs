//! Typed error kinds shared by the envelope, router, registry and orchestrator.
//!
//! Mirrors the error taxonomy every caller above the envelope switches on:
//! the error *kind* drives breaker accounting and fallback selection, never
//! a raw exception type.

use std::collections::HashMap;
use std::fmt;

/// Stable, machine-readable error code. `Display` yields the wire string
/// (`"VALIDATION_ERROR"`, ...) used in `Result::Error.error_code`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ErrorCode {
    Validation,
    Timeout,
    CircuitOpen,
    AgentUnavailable,
    NoAgentForIntent,
    UnknownWorkflow,
    ProcessingError,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorCode::Validation => "VALIDATION_ERROR",
            ErrorCode::Timeout => "TIMEOUT",
            ErrorCode::CircuitOpen => "CIRCUIT_BREAKER_OPEN",
            ErrorCode::AgentUnavailable => "AGENT_UNAVAILABLE",
            ErrorCode::NoAgentForIntent => "NO_AGENT_FOR_INTENT",
            ErrorCode::UnknownWorkflow => "UNKNOWN_WORKFLOW",
            ErrorCode::ProcessingError => "AGENT_PROCESSING_ERROR",
        };
        write!(f, "{s}")
    }
}

/// Uniform error raised inside the coordination core.
///
/// `CoreError` never escapes the envelope as a panic or an opaque
/// `Box<dyn Error>` — every boundary downgrades it to `AgentResult::Error`
/// (see `coach_errors::result`), carrying this error's `code()` verbatim.
#[derive(Debug, Clone, thiserror::Error)]
pub enum CoreError {
    #[error("validation failed: {message}")]
    Validation {
        message: String,
        metadata: HashMap<String, serde_json::Value>,
    },

    #[error("operation timed out after {duration_ms}ms")]
    Timeout {
        duration_ms: u64,
        operation: String,
    },

    #[error("circuit breaker is open: {message}")]
    CircuitOpen { message: String },

    #[error("agent '{agent_type}' is not registered")]
    AgentUnavailable { agent_type: String },

    #[error("no agent registered for intent '{intent}'")]
    NoAgentForIntent { intent: String },

    #[error("unknown workflow '{name}'")]
    UnknownWorkflow { name: String },

    #[error("processing failed: {message}")]
    ProcessingError {
        message: String,
        metadata: HashMap<String, serde_json::Value>,
    },
}

impl CoreError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            metadata: HashMap::new(),
        }
    }

    pub fn processing(message: impl Into<String>) -> Self {
        Self::ProcessingError {
            message: message.into(),
            metadata: HashMap::new(),
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            CoreError::Validation { .. } => ErrorCode::Validation,
            CoreError::Timeout { .. } => ErrorCode::Timeout,
            CoreError::CircuitOpen { .. } => ErrorCode::CircuitOpen,
            CoreError::AgentUnavailable { .. } => ErrorCode::AgentUnavailable,
            CoreError::NoAgentForIntent { .. } => ErrorCode::NoAgentForIntent,
            CoreError::UnknownWorkflow { .. } => ErrorCode::UnknownWorkflow,
            CoreError::ProcessingError { .. } => ErrorCode::ProcessingError,
        }
    }

    /// True for error kinds the breaker must never account as a failure.
    pub fn is_validation(&self) -> bool {
        matches!(self, CoreError::Validation { .. })
    }
}
