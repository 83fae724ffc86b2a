//! The uniform success/failure result every agent and the orchestrator return.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{CoreError, ErrorCode};

/// Tagged success/failure result returned by `process` and the envelope.
///
/// Deliberately not `std::result::Result` — hosts on the other side of the
/// (excluded) HTTP boundary serialize this directly, and both variants carry
/// `metadata` so logging and workflow bookkeeping have somewhere to put
/// auxiliary facts without widening the enum.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AgentResult {
    Success {
        data: Value,
        #[serde(default)]
        next_actions: Vec<String>,
        #[serde(default)]
        metadata: HashMap<String, Value>,
    },
    Error {
        error: String,
        error_code: ErrorCode,
        #[serde(default)]
        metadata: HashMap<String, Value>,
    },
}

impl AgentResult {
    pub fn success(data: Value) -> Self {
        Self::Success {
            data,
            next_actions: Vec::new(),
            metadata: HashMap::new(),
        }
    }

    pub fn success_with(
        data: Value,
        next_actions: Vec<String>,
        metadata: HashMap<String, Value>,
    ) -> Self {
        Self::Success {
            data,
            next_actions,
            metadata,
        }
    }

    pub fn error(error: impl Into<String>, error_code: ErrorCode) -> Self {
        Self::Error {
            error: error.into(),
            error_code,
            metadata: HashMap::new(),
        }
    }

    pub fn error_with(
        error: impl Into<String>,
        error_code: ErrorCode,
        metadata: HashMap<String, Value>,
    ) -> Self {
        Self::Error {
            error: error.into(),
            error_code,
            metadata,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, AgentResult::Success { .. })
    }

    pub fn data(&self) -> Option<&Value> {
        match self {
            AgentResult::Success { data, .. } => Some(data),
            AgentResult::Error { .. } => None,
        }
    }

    pub fn next_actions(&self) -> &[String] {
        match self {
            AgentResult::Success { next_actions, .. } => next_actions,
            AgentResult::Error { .. } => &[],
        }
    }

    pub fn metadata(&self) -> &HashMap<String, Value> {
        match self {
            AgentResult::Success { metadata, .. } => metadata,
            AgentResult::Error { metadata, .. } => metadata,
        }
    }

    pub fn with_metadata_entry(mut self, key: impl Into<String>, value: Value) -> Self {
        match &mut self {
            AgentResult::Success { metadata, .. } => {
                metadata.insert(key.into(), value);
            }
            AgentResult::Error { metadata, .. } => {
                metadata.insert(key.into(), value);
            }
        }
        self
    }
}

impl From<CoreError> for AgentResult {
    fn from(err: CoreError) -> Self {
        let code = err.code();
        AgentResult::error(err.to_string(), code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_round_trips_through_json() {
        let result = AgentResult::success(serde_json::json!({"ok": true}));
        let encoded = serde_json::to_string(&result).unwrap();
        let decoded: AgentResult = serde_json::from_str(&encoded).unwrap();
        assert!(decoded.is_success());
    }

    #[test]
    fn core_error_converts_to_error_result_with_matching_code() {
        let err = CoreError::validation("missing user_id");
        let result: AgentResult = err.into();
        match result {
            AgentResult::Error { error_code, .. } => assert_eq!(error_code, ErrorCode::Validation),
            _ => panic!("expected error result"),
        }
    }
}
