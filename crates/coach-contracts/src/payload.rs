//! The request payload carried alongside a [`Context`](coach_errors::Context)
//! into the protection envelope.
//!
//! The coordination core's payloads are duck-typed in the original system:
//! every intent accepts its own bag of fields. We keep the three
//! envelope-visible routing fields (`intent`, `workflow`, `message`) typed
//! and explicit, and collect everything intent-specific into `data` — a
//! single dynamic map validated by whichever agent ends up handling it.

use std::collections::HashMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::types::Intent;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Payload {
    /// Set for mode 2 (explicit intent) dispatch. Mutually exclusive with
    /// `workflow` in practice, though the envelope does not enforce that —
    /// the orchestrator's dispatch logic does.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intent: Option<Intent>,

    /// Set for mode 1 (named workflow) dispatch.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workflow: Option<String>,

    /// Set for mode 3 (free-text classification) dispatch.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// Per-call timeout override. Falls back to the agent's
    /// `default_timeout()` when absent.
    #[serde(skip_serializing_if = "Option::is_none", with = "duration_ms_option")]
    pub timeout: Option<Duration>,

    /// Intent-specific fields.
    #[serde(default)]
    pub data: HashMap<String, Value>,
}

impl Payload {
    pub fn for_intent(intent: Intent) -> Self {
        Self {
            intent: Some(intent),
            ..Default::default()
        }
    }

    pub fn for_workflow(workflow: impl Into<String>) -> Self {
        Self {
            workflow: Some(workflow.into()),
            ..Default::default()
        }
    }

    pub fn for_message(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            ..Default::default()
        }
    }

    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }
}

mod duration_ms_option {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(d) => serializer.serialize_some(&(d.as_millis() as u64)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Duration>, D::Error> {
        let millis: Option<u64> = Option::deserialize(deserializer)?;
        Ok(millis.map(Duration::from_millis))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builders_set_exactly_one_routing_field() {
        let p = Payload::for_intent(Intent::GetProfile);
        assert_eq!(p.intent, Some(Intent::GetProfile));
        assert!(p.workflow.is_none());
        assert!(p.message.is_none());
    }

    #[test]
    fn data_round_trips_through_json() {
        let p = Payload::for_intent(Intent::RecordAttempt).with_field("score", 0.9);
        let json = serde_json::to_string(&p).unwrap();
        let back: Payload = serde_json::from_str(&json).unwrap();
        assert_eq!(back.get("score").and_then(Value::as_f64), Some(0.9));
    }
}
