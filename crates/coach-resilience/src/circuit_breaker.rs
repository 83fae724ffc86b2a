//! Circuit breaker pattern.
//!
//! Three states — CLOSED (normal operation), OPEN (failing fast), HALF_OPEN
//! (probing for recovery). Ported from the learning coach's Python
//! `CircuitBreaker` with the guard-acquisition ordering made explicit: the
//! lock protecting state and counters is never held while the wrapped
//! operation runs.

use std::future::Future;
use std::time::{Duration, SystemTime};

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{info, warn};

/// Circuit breaker states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CircuitState {
    Closed,
    Open,
    HalfOpen,
}

/// Immutable-after-construction breaker configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CircuitBreakerConfig {
    pub name: String,
    pub failure_threshold: u32,
    pub recovery_timeout: Duration,
    pub success_threshold: u32,
    pub default_timeout: Duration,
}

impl Default for CircuitBreakerConfig {
    fn default() -> Self {
        Self {
            name: "unnamed".to_string(),
            failure_threshold: 5,
            recovery_timeout: Duration::from_secs(60),
            success_threshold: 3,
            default_timeout: Duration::from_secs(30),
        }
    }
}

/// Point-in-time snapshot of breaker counters, for `health()` and tests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CircuitBreakerStats {
    pub state: CircuitState,
    pub consecutive_failures: u32,
    pub half_open_successes: u32,
    pub total_calls: u64,
    pub state_changes: u64,
    #[serde(with = "chrono::serde::ts_seconds_option")]
    pub last_failure_at: Option<chrono::DateTime<chrono::Utc>>,
    #[serde(with = "chrono::serde::ts_seconds_option")]
    pub last_success_at: Option<chrono::DateTime<chrono::Utc>>,
    pub config: CircuitBreakerConfig,
}

/// Outcome of a call made through the breaker. Generic over the wrapped
/// operation's error type so this crate stays free of any domain error enum.
#[derive(Debug, thiserror::Error)]
pub enum BreakerError<E> {
    #[error("circuit breaker '{name}' is open")]
    Open { name: String },
    #[error("operation timed out after {duration_ms}ms")]
    Timeout { duration_ms: u64 },
    #[error(transparent)]
    Inner(E),
}

struct Inner {
    state: CircuitState,
    consecutive_failures: u32,
    half_open_successes: u32,
    total_calls: u64,
    state_changes: u64,
    last_failure_at: Option<SystemTime>,
    last_success_at: Option<SystemTime>,
}

/// A single named circuit breaker. One instance protects one agent.
pub struct CircuitBreaker {
    config: CircuitBreakerConfig,
    inner: Mutex<Inner>,
}

impl CircuitBreaker {
    pub fn new(config: CircuitBreakerConfig) -> Self {
        Self {
            config,
            inner: Mutex::new(Inner {
                state: CircuitState::Closed,
                consecutive_failures: 0,
                half_open_successes: 0,
                total_calls: 0,
                state_changes: 0,
                last_failure_at: None,
                last_success_at: None,
            }),
        }
    }

    /// Execute `operation` under breaker protection with `timeout`.
    ///
    /// The guard is acquired twice: once to decide admission (and possibly
    /// transition Open → HalfOpen), and once after the operation settles to
    /// record the outcome. It is never held across the `.await` of the
    /// wrapped future.
    pub async fn call<F, Fut, T, E>(
        &self,
        timeout: Duration,
        operation: F,
    ) -> Result<T, BreakerError<E>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        self.call_exempting(timeout, operation, |_| false).await
    }

    /// Like [`CircuitBreaker::call`], but `is_exempt` is consulted on a
    /// returned `Err` before accounting it as a failure. Errors it marks
    /// exempt (e.g. caller-side validation raised from inside the wrapped
    /// operation) are still admitted through the breaker and still returned
    /// to the caller, but never move `consecutive_failures` or trip the
    /// breaker open — the same guarantee the envelope already gives
    /// pre-breaker validation failures. This crate stays free of any domain
    /// error enum; callers supply the predicate.
    pub async fn call_exempting<F, Fut, T, E>(
        &self,
        timeout: Duration,
        operation: F,
        is_exempt: impl Fn(&E) -> bool,
    ) -> Result<T, BreakerError<E>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        {
            let mut guard = self.inner.lock().await;
            guard.total_calls += 1;

            match guard.state {
                CircuitState::Closed => {}
                CircuitState::HalfOpen => {}
                CircuitState::Open => {
                    let elapsed = guard
                        .last_failure_at
                        .and_then(|t| SystemTime::now().duration_since(t).ok())
                        .unwrap_or(Duration::ZERO);
                    if elapsed < self.config.recovery_timeout {
                        return Err(BreakerError::Open {
                            name: self.config.name.clone(),
                        });
                    }
                    guard.state = CircuitState::HalfOpen;
                    guard.half_open_successes = 0;
                    guard.state_changes += 1;
                    info!(breaker = %self.config.name, "circuit breaker half-opening to probe recovery");
                }
            }
        }

        let outcome = tokio::time::timeout(timeout, operation()).await;

        let mut guard = self.inner.lock().await;
        match outcome {
            Ok(Ok(value)) => {
                self.record_success(&mut guard);
                Ok(value)
            }
            Ok(Err(inner_err)) => {
                if !is_exempt(&inner_err) {
                    self.record_failure(&mut guard);
                }
                Err(BreakerError::Inner(inner_err))
            }
            Err(_) => {
                self.record_failure(&mut guard);
                Err(BreakerError::Timeout {
                    duration_ms: timeout.as_millis() as u64,
                })
            }
        }
    }

    fn record_success(&self, guard: &mut Inner) {
        guard.last_success_at = Some(SystemTime::now());
        match guard.state {
            CircuitState::Closed => {
                guard.consecutive_failures = 0;
            }
            CircuitState::HalfOpen => {
                guard.half_open_successes += 1;
                if guard.half_open_successes >= self.config.success_threshold {
                    guard.state = CircuitState::Closed;
                    guard.consecutive_failures = 0;
                    guard.half_open_successes = 0;
                    guard.state_changes += 1;
                    info!(breaker = %self.config.name, "circuit breaker closed after recovery");
                }
            }
            CircuitState::Open => {
                // Success can't be observed while Open admits no calls.
            }
        }
    }

    fn record_failure(&self, guard: &mut Inner) {
        guard.last_failure_at = Some(SystemTime::now());
        match guard.state {
            CircuitState::Closed => {
                guard.consecutive_failures += 1;
                if guard.consecutive_failures >= self.config.failure_threshold {
                    guard.state = CircuitState::Open;
                    guard.half_open_successes = 0;
                    guard.state_changes += 1;
                    warn!(
                        breaker = %self.config.name,
                        failures = guard.consecutive_failures,
                        "circuit breaker opened"
                    );
                }
            }
            CircuitState::HalfOpen => {
                guard.state = CircuitState::Open;
                guard.half_open_successes = 0;
                guard.state_changes += 1;
                warn!(breaker = %self.config.name, "circuit breaker reopened during probe");
            }
            CircuitState::Open => {}
        }
    }

    pub async fn state(&self) -> CircuitState {
        self.inner.lock().await.state
    }

    pub async fn stats(&self) -> CircuitBreakerStats {
        let guard = self.inner.lock().await;
        CircuitBreakerStats {
            state: guard.state,
            consecutive_failures: guard.consecutive_failures,
            half_open_successes: guard.half_open_successes,
            total_calls: guard.total_calls,
            state_changes: guard.state_changes,
            last_failure_at: guard.last_failure_at.map(chrono::DateTime::from),
            last_success_at: guard.last_success_at.map(chrono::DateTime::from),
            config: self.config.clone(),
        }
    }

    pub async fn reset(&self) {
        let mut guard = self.inner.lock().await;
        guard.state = CircuitState::Closed;
        guard.consecutive_failures = 0;
        guard.half_open_successes = 0;
        guard.last_failure_at = None;
        guard.last_success_at = None;
        info!(breaker = %self.config.name, "circuit breaker reset");
    }

    pub fn config(&self) -> &CircuitBreakerConfig {
        &self.config
    }
}
