//! Curriculum Planner agent: learning paths, pacing, and difficulty adaptation.

use std::collections::HashSet;

use async_trait::async_trait;
use coach_contracts::{Agent, AgentType, Intent, Payload};
use coach_errors::{AgentResult, Context, CoreError};
use coach_resilience::{CircuitBreaker, CircuitBreakerConfig};
use serde_json::json;

pub struct CurriculumPlannerAgent {
    breaker: CircuitBreaker,
}

impl Default for CurriculumPlannerAgent {
    fn default() -> Self {
        Self::new()
    }
}

impl CurriculumPlannerAgent {
    pub fn new() -> Self {
        Self {
            breaker: CircuitBreaker::new(CircuitBreakerConfig {
                name: "curriculum_planner".to_string(),
                ..CircuitBreakerConfig::default()
            }),
        }
    }

    fn create_learning_path(&self, payload: &Payload) -> Result<AgentResult, CoreError> {
        let goals = payload.get("goals").and_then(|v| v.as_array()).cloned().unwrap_or_default();
        let weeks = payload.get("weeks").and_then(|v| v.as_u64()).unwrap_or(4);
        if goals.is_empty() {
            return Err(CoreError::validation("at least one goal is required to create a learning path"));
        }
        let modules: Vec<_> = goals
            .iter()
            .enumerate()
            .map(|(i, goal)| json!({"module_id": format!("m{i}"), "topic": goal, "day_offset": i as u64 * 7}))
            .collect();
        Ok(AgentResult::success(json!({
            "total_days": weeks * 7,
            "modules": modules,
        })))
    }

    fn adapt_difficulty(&self, payload: &Payload) -> Result<AgentResult, CoreError> {
        let direction = payload.get("direction").and_then(|v| v.as_str()).unwrap_or("reduce");
        let delta = match direction {
            "increase" => 1,
            _ => -1,
        };
        Ok(AgentResult::success(json!({ "difficulty_delta": delta })))
    }

    fn adjust_pacing(&self, payload: &Payload) -> Result<AgentResult, CoreError> {
        let pace = payload.get("pace").and_then(|v| v.as_str()).unwrap_or("steady");
        Ok(AgentResult::success(json!({ "pace": pace })))
    }
}

#[async_trait]
impl Agent for CurriculumPlannerAgent {
    fn agent_type(&self) -> AgentType {
        AgentType::CurriculumPlanner
    }

    fn supported_intents(&self) -> HashSet<Intent> {
        HashSet::from([
            Intent::CreateLearningPath,
            Intent::GenerateCurriculum,
            Intent::UpdateCurriculum,
            Intent::AdaptDifficulty,
            Intent::RequestNextTopic,
            Intent::GetCurriculumStatus,
            Intent::ScheduleSpacedRepetition,
            Intent::AddMiniProject,
            Intent::AdjustPacing,
        ])
    }

    async fn process(&self, _context: &Context, payload: &Payload) -> Result<AgentResult, CoreError> {
        match payload.intent {
            Some(Intent::CreateLearningPath) | Some(Intent::GenerateCurriculum) => self.create_learning_path(payload),
            Some(Intent::AdaptDifficulty) => self.adapt_difficulty(payload),
            Some(Intent::AdjustPacing) => self.adjust_pacing(payload),
            Some(Intent::UpdateCurriculum)
            | Some(Intent::RequestNextTopic)
            | Some(Intent::GetCurriculumStatus)
            | Some(Intent::ScheduleSpacedRepetition)
            | Some(Intent::AddMiniProject) => Ok(AgentResult::success(json!({ "acknowledged": true }))),
            _ => Err(CoreError::validation("unsupported intent for curriculum planner")),
        }
    }

    fn breaker(&self) -> &CircuitBreaker {
        &self.breaker
    }
}
