//! Reviewer agent: submission evaluation, testing, and feedback.
//!
//! Code execution is delegated to a host-provided sandbox (see Non-goals);
//! this agent works entirely from a submitted `test_results` summary.

use std::collections::HashSet;

use async_trait::async_trait;
use coach_contracts::{Agent, AgentType, Intent, Payload};
use coach_errors::{AgentResult, Context, CoreError};
use coach_resilience::{CircuitBreaker, CircuitBreakerConfig};
use serde_json::json;

pub struct ReviewerAgent {
    breaker: CircuitBreaker,
}

impl Default for ReviewerAgent {
    fn default() -> Self {
        Self::new()
    }
}

impl ReviewerAgent {
    pub fn new() -> Self {
        Self {
            breaker: CircuitBreaker::new(CircuitBreakerConfig {
                name: "reviewer".to_string(),
                ..CircuitBreakerConfig::default()
            }),
        }
    }

    fn evaluate_submission(&self, payload: &Payload) -> Result<AgentResult, CoreError> {
        let Some(task_id) = payload.get("task_id").and_then(|v| v.as_str()) else {
            return Err(CoreError::validation("task_id is required"));
        };
        let tests_passed = payload.get("tests_passed").and_then(|v| v.as_u64()).unwrap_or(0);
        let tests_total = payload.get("tests_total").and_then(|v| v.as_u64()).unwrap_or(0);
        let score = if tests_total > 0 {
            tests_passed as f64 / tests_total as f64 * 100.0
        } else {
            0.0
        };
        let passed = tests_total > 0 && tests_passed == tests_total;
        Ok(AgentResult::success(json!({
            "task_id": task_id,
            "passed": passed,
            "score": score,
            "tests_passed": tests_passed,
            "tests_total": tests_total,
        })))
    }

    fn generate_feedback(&self, payload: &Payload) -> Result<AgentResult, CoreError> {
        let passed = payload.get("passed").and_then(|v| v.as_bool()).unwrap_or(false);
        let feedback = if passed {
            "All tests pass. Consider reviewing edge cases before moving on."
        } else {
            "Some tests are failing. Re-check the failing cases and your assumptions about the inputs."
        };
        Ok(AgentResult::success(json!({ "feedback": feedback })))
    }

    fn check_code_quality(&self, payload: &Payload) -> Result<AgentResult, CoreError> {
        let lines = payload.get("line_count").and_then(|v| v.as_u64()).unwrap_or(0);
        let flags = if lines > 200 {
            vec!["consider splitting this into smaller functions"]
        } else {
            vec![]
        };
        Ok(AgentResult::success(json!({ "flags": flags })))
    }
}

#[async_trait]
impl Agent for ReviewerAgent {
    fn agent_type(&self) -> AgentType {
        AgentType::Reviewer
    }

    fn supported_intents(&self) -> HashSet<Intent> {
        HashSet::from([
            Intent::EvaluateSubmission,
            Intent::RunTests,
            Intent::GenerateFeedback,
            Intent::CheckCodeQuality,
            Intent::CompareSubmissions,
            Intent::ValidateSolution,
        ])
    }

    async fn process(&self, _context: &Context, payload: &Payload) -> Result<AgentResult, CoreError> {
        match payload.intent {
            Some(Intent::EvaluateSubmission) | Some(Intent::ValidateSolution) => self.evaluate_submission(payload),
            Some(Intent::GenerateFeedback) => self.generate_feedback(payload),
            Some(Intent::CheckCodeQuality) => self.check_code_quality(payload),
            Some(Intent::RunTests) | Some(Intent::CompareSubmissions) => {
                Ok(AgentResult::success(json!({ "acknowledged": true })))
            }
            _ => Err(CoreError::validation("unsupported intent for reviewer")),
        }
    }

    fn breaker(&self) -> &CircuitBreaker {
        &self.breaker
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context() -> Context {
        Context::new("u1", "s1").unwrap()
    }

    #[tokio::test]
    async fn evaluate_submission_requires_task_id() {
        let agent = ReviewerAgent::new();
        let err = agent
            .process(&context(), &Payload::for_intent(Intent::EvaluateSubmission))
            .await
            .unwrap_err();
        assert!(err.is_validation());
    }

    #[tokio::test]
    async fn all_tests_passing_marks_submission_passed() {
        let agent = ReviewerAgent::new();
        let payload = Payload::for_intent(Intent::EvaluateSubmission)
            .with_field("task_id", json!("t1"))
            .with_field("tests_passed", json!(3))
            .with_field("tests_total", json!(3));
        let result = agent.process(&context(), &payload).await.unwrap();
        assert_eq!(result.data().unwrap()["passed"], json!(true));
        assert_eq!(result.data().unwrap()["score"], json!(100.0));
    }
}
