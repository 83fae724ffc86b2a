//! Health reporting shared by every agent and the orchestrator.

use serde::{Deserialize, Serialize};

use crate::circuit_breaker::CircuitBreakerStats;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthState {
    Healthy,
    Degraded,
}

impl HealthState {
    /// An agent is healthy iff its breaker is Closed.
    pub fn from_breaker_stats(stats: &CircuitBreakerStats) -> Self {
        use crate::circuit_breaker::CircuitState;
        match stats.state {
            CircuitState::Closed => HealthState::Healthy,
            CircuitState::Open | CircuitState::HalfOpen => HealthState::Degraded,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentHealth {
    pub agent_type: String,
    pub supported_intents: Vec<String>,
    pub breaker_stats: CircuitBreakerStats,
    pub status: HealthState,
}
