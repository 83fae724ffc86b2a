//! The contract every specialist and the orchestrator itself implement.

use std::collections::HashSet;
use std::time::Duration;

use async_trait::async_trait;
use coach_errors::{AgentResult, Context, CoreError};
use coach_resilience::{AgentHealth, CircuitBreaker, HealthState};

use crate::payload::Payload;
use crate::types::{AgentType, Intent};

/// One participant in the coordination core.
///
/// `process` is the only method that does real work; it returns `Ok` with
/// an `AgentResult::Success` on success. Any failure — a raised exception in
/// the original system, or a deliberate domain-level rejection — is
/// expressed as `Err(CoreError)`. The protection envelope is the only
/// caller that should invoke `process` directly; everything else goes
/// through [`crate::envelope::execute_with_protection`].
#[async_trait]
pub trait Agent: Send + Sync {
    fn agent_type(&self) -> AgentType;

    /// Intents this agent accepts through the envelope's default payload
    /// validation. An agent's own set may overlap another agent's — the
    /// static routing table in `coach-router` resolves any overlap to one
    /// canonical owner for free-text and explicit-intent dispatch; a
    /// workflow step targets an agent directly and is unaffected.
    fn supported_intents(&self) -> HashSet<Intent>;

    async fn process(&self, context: &Context, payload: &Payload) -> Result<AgentResult, CoreError>;

    /// Fallback invoked when the wrapped call times out. `None` means no
    /// fallback is available and the envelope returns a Timeout error.
    async fn on_timeout(&self, _context: &Context, _payload: &Payload) -> Option<AgentResult> {
        None
    }

    /// Fallback invoked when `process` returns `Err` for a reason other
    /// than payload validation (which never reaches the breaker).
    async fn on_error(&self, _context: &Context, _payload: &Payload, _error: &CoreError) -> Option<AgentResult> {
        None
    }

    fn default_timeout(&self) -> Duration {
        Duration::from_secs(30)
    }

    fn breaker(&self) -> &CircuitBreaker;

    /// Payload-shape validation run before the breaker is touched. The
    /// default requires `payload.intent` to be present and supported; the
    /// orchestrator overrides this since it also accepts `workflow` and
    /// free-text `message` payloads.
    fn validate_payload(&self, payload: &Payload) -> Result<(), CoreError> {
        let Some(intent) = payload.intent else {
            return Err(CoreError::validation("payload.intent is required"));
        };
        if !self.supported_intents().contains(&intent) {
            return Err(CoreError::validation(format!(
                "{} does not support intent {}",
                self.agent_type(),
                intent
            )));
        }
        Ok(())
    }

    async fn health(&self) -> AgentHealth {
        let stats = self.breaker().stats().await;
        let status = HealthState::from_breaker_stats(&stats);
        AgentHealth {
            agent_type: self.agent_type().to_string(),
            supported_intents: self.supported_intents().iter().map(|i| i.to_string()).collect(),
            breaker_stats: stats,
            status,
        }
    }
}
