//! Profile agent: skill assessment, goals, and constraints.

use std::collections::HashSet;

use async_trait::async_trait;
use coach_contracts::{Agent, AgentType, Intent, Payload};
use coach_errors::{AgentResult, Context, CoreError, SkillLevel};
use coach_resilience::{CircuitBreaker, CircuitBreakerConfig};
use serde_json::json;

/// A diagnostic question, scored by declared difficulty.
struct DiagnosticQuestion {
    id: &'static str,
    prompt: &'static str,
    difficulty: f64,
    correct_choice: &'static str,
}

const QUESTION_BANK: &[DiagnosticQuestion] = &[
    DiagnosticQuestion { id: "q1", prompt: "What does `&mut T` express?", difficulty: 0.2, correct_choice: "exclusive_borrow" },
    DiagnosticQuestion { id: "q2", prompt: "What happens when a value goes out of scope?", difficulty: 0.3, correct_choice: "drop" },
    DiagnosticQuestion { id: "q3", prompt: "What does `Send + Sync` guarantee?", difficulty: 0.5, correct_choice: "thread_safety" },
    DiagnosticQuestion { id: "q4", prompt: "When does a closure capture by move?", difficulty: 0.6, correct_choice: "move_keyword_or_ownership_transfer" },
    DiagnosticQuestion { id: "q5", prompt: "What is the difference between `dyn Trait` and `impl Trait`?", difficulty: 0.8, correct_choice: "dynamic_vs_static_dispatch" },
];

pub struct ProfileAgent {
    breaker: CircuitBreaker,
}

impl Default for ProfileAgent {
    fn default() -> Self {
        Self::new()
    }
}

impl ProfileAgent {
    pub fn new() -> Self {
        Self {
            breaker: CircuitBreaker::new(CircuitBreakerConfig {
                name: "profile".to_string(),
                ..CircuitBreakerConfig::default()
            }),
        }
    }

    fn question_bank() -> serde_json::Value {
        json!(QUESTION_BANK
            .iter()
            .map(|q| json!({"id": q.id, "prompt": q.prompt, "difficulty": q.difficulty}))
            .collect::<Vec<_>>())
    }

    /// Deterministic scoring policy: percentage of weighted-correct answers
    /// maps to a skill tier. No responses -> no score, just the question bank.
    fn evaluate_responses(responses: &[serde_json::Value]) -> (SkillLevel, f64) {
        let mut total = 0.0;
        let mut max = 0.0;
        for response in responses {
            let Some(question_id) = response.get("question_id").and_then(|v| v.as_str()) else {
                continue;
            };
            let Some(question) = QUESTION_BANK.iter().find(|q| q.id == question_id) else {
                continue;
            };
            max += question.difficulty;
            let answered = response.get("choice").and_then(|v| v.as_str());
            if answered == Some(question.correct_choice) {
                total += question.difficulty;
            }
        }
        if max == 0.0 {
            return (SkillLevel::Beginner, 0.0);
        }
        let percentage = total / max;
        let level = if percentage >= 0.9 {
            SkillLevel::Expert
        } else if percentage >= 0.75 {
            SkillLevel::Advanced
        } else if percentage >= 0.5 {
            SkillLevel::Intermediate
        } else {
            SkillLevel::Beginner
        };
        (level, percentage)
    }

    async fn assess_skill_level(&self, payload: &Payload) -> Result<AgentResult, CoreError> {
        let responses = payload
            .get("responses")
            .and_then(|v| v.as_array())
            .cloned()
            .unwrap_or_default();

        if responses.is_empty() {
            return Ok(AgentResult::success(json!({ "questions": Self::question_bank() })));
        }

        let (level, percentage) = Self::evaluate_responses(&responses);
        Ok(AgentResult::success(json!({
            "skill_level": level,
            "percentage": percentage,
        })))
    }

    async fn update_goals(&self, payload: &Payload) -> Result<AgentResult, CoreError> {
        let goals = payload.get("goals").and_then(|v| v.as_array()).cloned().unwrap_or_default();
        if goals.is_empty() {
            return Err(CoreError::validation("goals must be a non-empty array"));
        }
        Ok(AgentResult::success(json!({ "goals": goals })))
    }

    async fn set_constraints(&self, payload: &Payload) -> Result<AgentResult, CoreError> {
        let minutes_per_day = payload.get("minutes_per_day").and_then(|v| v.as_u64()).unwrap_or(30);
        Ok(AgentResult::success(json!({ "minutes_per_day": minutes_per_day })))
    }

    async fn create_or_update_profile(&self, context: &Context, payload: &Payload) -> Result<AgentResult, CoreError> {
        Ok(AgentResult::success(json!({
            "user_id": context.user_id,
            "preferences": payload.data,
        })))
    }

    async fn get_profile(&self, context: &Context) -> Result<AgentResult, CoreError> {
        Ok(AgentResult::success(json!({
            "user_id": context.user_id,
            "skill_level": context.skill_level,
            "learning_goals": context.learning_goals,
        })))
    }

    async fn parse_timeframe(&self, payload: &Payload) -> Result<AgentResult, CoreError> {
        let raw = payload.get("timeframe").and_then(|v| v.as_str()).unwrap_or("");
        if raw.is_empty() {
            return Err(CoreError::validation("timeframe is required"));
        }
        let weeks = raw
            .split_whitespace()
            .find_map(|tok| tok.parse::<u32>().ok())
            .unwrap_or(4);
        Ok(AgentResult::success(json!({ "weeks": weeks })))
    }
}

#[async_trait]
impl Agent for ProfileAgent {
    fn agent_type(&self) -> AgentType {
        AgentType::Profile
    }

    fn supported_intents(&self) -> HashSet<Intent> {
        HashSet::from([
            Intent::AssessSkillLevel,
            Intent::UpdateGoals,
            Intent::SetConstraints,
            Intent::CreateProfile,
            Intent::UpdateProfile,
            Intent::GetProfile,
            Intent::ParseTimeframe,
        ])
    }

    async fn process(&self, context: &Context, payload: &Payload) -> Result<AgentResult, CoreError> {
        match payload.intent {
            Some(Intent::AssessSkillLevel) => self.assess_skill_level(payload).await,
            Some(Intent::UpdateGoals) => self.update_goals(payload).await,
            Some(Intent::SetConstraints) => self.set_constraints(payload).await,
            Some(Intent::CreateProfile) | Some(Intent::UpdateProfile) => {
                self.create_or_update_profile(context, payload).await
            }
            Some(Intent::GetProfile) => self.get_profile(context).await,
            Some(Intent::ParseTimeframe) => self.parse_timeframe(payload).await,
            _ => Err(CoreError::validation("unsupported intent for profile agent")),
        }
    }

    fn breaker(&self) -> &CircuitBreaker {
        &self.breaker
    }
}
