//! The agent contract, protection envelope, and the closed vocabulary of
//! agent types and intents that every other crate in the coordination core
//! builds on.

pub mod agent;
pub mod envelope;
pub mod payload;
pub mod types;

pub use agent::Agent;
pub use envelope::execute_with_protection;
pub use payload::Payload;
pub use types::{AgentType, Intent};

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;
    use coach_errors::{AgentResult, Context, CoreError, ErrorCode};
    use coach_resilience::{CircuitBreaker, CircuitBreakerConfig, CorrelatedLogger};

    use super::*;

    struct FlakyAgent {
        breaker: CircuitBreaker,
        calls: AtomicU32,
        fail_first_n: u32,
    }

    impl FlakyAgent {
        fn new(fail_first_n: u32) -> Self {
            Self {
                breaker: CircuitBreaker::new(CircuitBreakerConfig {
                    name: "flaky".into(),
                    failure_threshold: 10,
                    ..CircuitBreakerConfig::default()
                }),
                calls: AtomicU32::new(0),
                fail_first_n,
            }
        }
    }

    #[async_trait]
    impl Agent for FlakyAgent {
        fn agent_type(&self) -> AgentType {
            AgentType::Profile
        }

        fn supported_intents(&self) -> HashSet<Intent> {
            HashSet::from([Intent::GetProfile])
        }

        async fn process(&self, _context: &Context, _payload: &Payload) -> Result<AgentResult, CoreError> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            if n < self.fail_first_n {
                Err(CoreError::processing("transient failure"))
            } else {
                Ok(AgentResult::success(serde_json::json!({"ok": true})))
            }
        }

        async fn on_error(&self, _context: &Context, _payload: &Payload, _error: &CoreError) -> Option<AgentResult> {
            None
        }

        fn breaker(&self) -> &CircuitBreaker {
            &self.breaker
        }
    }

    fn logger() -> CorrelatedLogger {
        CorrelatedLogger::new("test")
    }

    #[tokio::test]
    async fn validation_error_short_circuits_before_the_breaker() {
        let agent = FlakyAgent::new(0);
        let context = Context::new("u1", "s1").unwrap();
        let payload = Payload::for_intent(Intent::RecordAttempt); // not supported by FlakyAgent
        let result = execute_with_protection(&agent, &context, &payload, &logger()).await;
        match result {
            AgentResult::Error { error_code, .. } => assert_eq!(error_code, ErrorCode::Validation),
            _ => panic!("expected validation error"),
        }
        assert_eq!(agent.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn empty_context_ids_are_rejected_without_calling_the_agent() {
        let agent = FlakyAgent::new(0);
        let mut context = Context::new("u1", "s1").unwrap();
        context.user_id = String::new();
        let payload = Payload::for_intent(Intent::GetProfile);
        let result = execute_with_protection(&agent, &context, &payload, &logger()).await;
        assert!(!result.is_success());
        assert_eq!(agent.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn successful_call_returns_success_result() {
        let agent = FlakyAgent::new(0);
        let context = Context::new("u1", "s1").unwrap();
        let payload = Payload::for_intent(Intent::GetProfile);
        let result = execute_with_protection(&agent, &context, &payload, &logger()).await;
        assert!(result.is_success());
    }

    struct DomainValidatingAgent {
        breaker: CircuitBreaker,
    }

    impl DomainValidatingAgent {
        fn new() -> Self {
            Self {
                breaker: CircuitBreaker::new(CircuitBreakerConfig {
                    name: "domain-validating".into(),
                    failure_threshold: 1,
                    ..CircuitBreakerConfig::default()
                }),
            }
        }
    }

    #[async_trait]
    impl Agent for DomainValidatingAgent {
        fn agent_type(&self) -> AgentType {
            AgentType::ProgressTracker
        }

        fn supported_intents(&self) -> HashSet<Intent> {
            HashSet::from([Intent::RecordAttempt])
        }

        async fn process(&self, _context: &Context, _payload: &Payload) -> Result<AgentResult, CoreError> {
            Err(CoreError::validation("task_id is required"))
        }

        fn breaker(&self) -> &CircuitBreaker {
            &self.breaker
        }
    }

    #[tokio::test]
    async fn validation_raised_from_inside_process_never_counts_as_a_breaker_failure() {
        let agent = DomainValidatingAgent::new();
        let context = Context::new("u1", "s1").unwrap();
        let payload = Payload::for_intent(Intent::RecordAttempt);

        for _ in 0..3 {
            let result = execute_with_protection(&agent, &context, &payload, &logger()).await;
            match result {
                AgentResult::Error { error_code, .. } => assert_eq!(error_code, ErrorCode::Validation),
                _ => panic!("expected validation error"),
            }
        }

        let stats = agent.breaker.stats().await;
        assert_eq!(stats.consecutive_failures, 0);
        assert_eq!(stats.state, coach_resilience::CircuitState::Closed);
    }

    #[tokio::test]
    async fn processing_error_without_fallback_surfaces_as_error_result() {
        let agent = FlakyAgent::new(100);
        let context = Context::new("u1", "s1").unwrap();
        let payload = Payload::for_intent(Intent::GetProfile).with_timeout(Duration::from_millis(50));
        let result = execute_with_protection(&agent, &context, &payload, &logger()).await;
        match result {
            AgentResult::Error { error_code, .. } => assert_eq!(error_code, ErrorCode::ProcessingError),
            _ => panic!("expected processing error"),
        }
    }
}
