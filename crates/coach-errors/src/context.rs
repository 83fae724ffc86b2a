//! Per-request context threaded through the envelope and every agent.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::error::CoreError;

/// Learner skill level, as assessed by the Profile agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillLevel {
    Beginner,
    Intermediate,
    Advanced,
    Expert,
}

/// Immutable per-request carrier. Agents read from this; they never mutate
/// it — any scratch state an agent wants to keep goes on its own `Result`,
/// not here (see concurrency model, §5).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Context {
    pub user_id: String,
    pub session_id: String,
    pub correlation_id: String,
    #[serde(default)]
    pub current_objective: Option<String>,
    #[serde(default)]
    pub skill_level: Option<SkillLevel>,
    #[serde(default)]
    pub learning_goals: Vec<String>,
    #[serde(default)]
    pub time_constraints: HashMap<String, Value>,
    #[serde(default)]
    pub preferences: HashMap<String, Value>,
    #[serde(default)]
    pub attempt_count: u32,
    #[serde(default)]
    pub last_feedback: Option<HashMap<String, Value>>,
}

impl Context {
    /// Build a context, generating a correlation id if `user_id` or
    /// `session_id` are empty this returns `CoreError::Validation` — the
    /// envelope is the only other place that performs this check, and it
    /// does so again on every call since a `Context` can be reused across
    /// requests by a host that doesn't reconstruct it each time.
    pub fn new(user_id: impl Into<String>, session_id: impl Into<String>) -> Result<Self, CoreError> {
        let user_id = user_id.into();
        let session_id = session_id.into();
        if user_id.is_empty() {
            return Err(CoreError::validation("user_id is required in context"));
        }
        if session_id.is_empty() {
            return Err(CoreError::validation("session_id is required in context"));
        }
        Ok(Self {
            user_id,
            session_id,
            correlation_id: Uuid::new_v4().to_string(),
            current_objective: None,
            skill_level: None,
            learning_goals: Vec::new(),
            time_constraints: HashMap::new(),
            preferences: HashMap::new(),
            attempt_count: 0,
            last_feedback: None,
        })
    }

    pub fn with_correlation_id(mut self, correlation_id: impl Into<String>) -> Self {
        self.correlation_id = correlation_id.into();
        self
    }

    pub fn with_skill_level(mut self, skill_level: SkillLevel) -> Self {
        self.skill_level = Some(skill_level);
        self
    }

    pub fn with_goals(mut self, goals: Vec<String>) -> Self {
        self.learning_goals = goals;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_user_id() {
        let err = Context::new("", "s1").unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn rejects_empty_session_id() {
        let err = Context::new("u1", "").unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn always_has_a_correlation_id() {
        let ctx = Context::new("u1", "s1").unwrap();
        assert!(!ctx.correlation_id.is_empty());
    }

    #[test]
    fn explicit_correlation_id_is_preserved() {
        let ctx = Context::new("u1", "s1").unwrap().with_correlation_id("corr-42");
        assert_eq!(ctx.correlation_id, "corr-42");
    }
}
