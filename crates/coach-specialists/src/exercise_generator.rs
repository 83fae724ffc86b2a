//! Exercise Generator agent.
//!
//! `generate_exercise` always returns a template-based exercise here — the
//! core has no LLM dependency (see Non-goals) — but the shape and the
//! `on_timeout`/`on_error` fallbacks mirror a design meant to sit in front
//! of an optional, fallible generation service.

use std::collections::HashSet;

use async_trait::async_trait;
use coach_contracts::{Agent, AgentType, Intent, Payload};
use coach_errors::{AgentResult, Context, CoreError};
use coach_resilience::{CircuitBreaker, CircuitBreakerConfig};
use serde_json::json;

pub struct ExerciseGeneratorAgent {
    breaker: CircuitBreaker,
}

impl Default for ExerciseGeneratorAgent {
    fn default() -> Self {
        Self::new()
    }
}

impl ExerciseGeneratorAgent {
    pub fn new() -> Self {
        Self {
            breaker: CircuitBreaker::new(CircuitBreakerConfig {
                name: "exercise_generator".to_string(),
                ..CircuitBreakerConfig::default()
            }),
        }
    }

    fn template_exercise(&self, topic: &str, difficulty: &str) -> serde_json::Value {
        json!({
            "title": format!("{topic} practice — {difficulty}"),
            "instructions": format!("Write a short Rust program exercising {topic}."),
            "difficulty": difficulty,
            "generation_method": "template",
        })
    }

    fn generate_exercise(&self, payload: &Payload) -> Result<AgentResult, CoreError> {
        let topic = payload.get("topic").and_then(|v| v.as_str()).unwrap_or("general");
        let difficulty = payload.get("difficulty").and_then(|v| v.as_str()).unwrap_or("beginner");
        Ok(AgentResult::success(self.template_exercise(topic, difficulty)))
    }

    fn create_test_cases(&self, payload: &Payload) -> Result<AgentResult, CoreError> {
        let count = payload.get("count").and_then(|v| v.as_u64()).unwrap_or(3);
        let cases: Vec<_> = (0..count).map(|i| json!({"name": format!("case_{i}")})).collect();
        Ok(AgentResult::success(json!({ "test_cases": cases })))
    }

    fn generate_hints(&self, payload: &Payload) -> Result<AgentResult, CoreError> {
        let attempt = payload.get("attempt_number").and_then(|v| v.as_u64()).unwrap_or(1);
        let hint = match attempt {
            1 => "Re-read the problem statement and identify the inputs and outputs.",
            2 => "Consider which standard library type models this data best.",
            _ => "Compare your approach against the simplest correct solution you can think of.",
        };
        Ok(AgentResult::success(json!({ "hint": hint, "attempt_number": attempt })))
    }
}

#[async_trait]
impl Agent for ExerciseGeneratorAgent {
    fn agent_type(&self) -> AgentType {
        AgentType::ExerciseGenerator
    }

    fn supported_intents(&self) -> HashSet<Intent> {
        HashSet::from([
            Intent::GenerateExercise,
            Intent::CreateTestCases,
            Intent::GenerateHints,
            Intent::AdaptDifficulty,
            Intent::CreateStretchExercise,
            Intent::CreateRecapExercise,
            Intent::GenerateProjectExercise,
        ])
    }

    async fn process(&self, _context: &Context, payload: &Payload) -> Result<AgentResult, CoreError> {
        match payload.intent {
            Some(Intent::GenerateExercise) => self.generate_exercise(payload),
            Some(Intent::CreateTestCases) => self.create_test_cases(payload),
            Some(Intent::GenerateHints) => self.generate_hints(payload),
            Some(Intent::CreateStretchExercise) => {
                let topic = payload.get("topic").and_then(|v| v.as_str()).unwrap_or("general");
                Ok(AgentResult::success(self.template_exercise(topic, "stretch")))
            }
            Some(Intent::CreateRecapExercise) => {
                let topic = payload.get("topic").and_then(|v| v.as_str()).unwrap_or("general");
                Ok(AgentResult::success(self.template_exercise(topic, "recap")))
            }
            Some(Intent::GenerateProjectExercise) => {
                let topic = payload.get("topic").and_then(|v| v.as_str()).unwrap_or("general");
                Ok(AgentResult::success(self.template_exercise(topic, "project")))
            }
            Some(Intent::AdaptDifficulty) => {
                let direction = payload.get("direction").and_then(|v| v.as_str()).unwrap_or("reduce");
                Ok(AgentResult::success(json!({ "direction": direction })))
            }
            _ => Err(CoreError::validation("unsupported intent for exercise generator")),
        }
    }

    /// A timed-out exercise generation call degrades to the same template
    /// path used when generation succeeds trivially fast.
    async fn on_timeout(&self, _context: &Context, payload: &Payload) -> Option<AgentResult> {
        if payload.intent == Some(Intent::GenerateExercise) {
            let topic = payload.get("topic").and_then(|v| v.as_str()).unwrap_or("general");
            let difficulty = payload.get("difficulty").and_then(|v| v.as_str()).unwrap_or("beginner");
            Some(AgentResult::success(self.template_exercise(topic, difficulty)))
        } else {
            None
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
    async fn generate_exercise_returns_a_template() {
        let agent = ExerciseGeneratorAgent::new();
        let payload = Payload::for_intent(Intent::GenerateExercise).with_field("topic", json!("closures"));
        let result = agent.process(&context(), &payload).await.unwrap();
        assert_eq!(result.data().unwrap()["generation_method"], json!("template"));
    }

    #[tokio::test]
    async fn on_timeout_still_produces_a_usable_exercise() {
        let agent = ExerciseGeneratorAgent::new();
        let payload = Payload::for_intent(Intent::GenerateExercise);
        let fallback = agent.on_timeout(&context(), &payload).await.unwrap();
        assert!(fallback.is_success());
    }
}
