//! Circuit breaker, correlated logging and health reporting for the
//! learning-coach coordination core.

pub mod circuit_breaker;
pub mod health;
pub mod logging;

pub use circuit_breaker::{BreakerError, CircuitBreaker, CircuitBreakerConfig, CircuitBreakerStats, CircuitState};
pub use health::{AgentHealth, HealthState};
pub use logging::CorrelatedLogger;
