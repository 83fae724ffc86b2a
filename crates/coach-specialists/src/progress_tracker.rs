//! Progress Tracker agent.
//!
//! Wraps the progress adaptation engine (`coach-progress`) behind the agent
//! contract. The core holds no repositories (see Non-goals), so every
//! operation here reads its plan/submission history straight out of the
//! payload rather than a `CurriculumRepository`/`SubmissionRepository`.

use std::collections::HashSet;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use coach_contracts::{Agent, AgentType, Intent, Payload};
use coach_errors::{AgentResult, Context, CoreError};
use coach_progress::{
    aggregate_triggers, calculate_metrics, calculate_streak, consecutive_failures_trigger,
    per_submission_quick_success_trigger, prioritize, resolve_day_offset, PlanSummary, SubmissionSummary, TaskSummary,
};
use coach_resilience::{CircuitBreaker, CircuitBreakerConfig};
use serde_json::{json, Value};

pub struct ProgressTrackerAgent {
    breaker: CircuitBreaker,
}

impl Default for ProgressTrackerAgent {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_tasks(value: &Value) -> Vec<TaskSummary> {
    value
        .as_array()
        .map(|arr| {
            arr.iter()
                .map(|t| TaskSummary {
                    day_offset: t.get("day_offset").and_then(|v| v.as_u64()).unwrap_or(0) as u32,
                    estimated_minutes: t.get("estimated_minutes").and_then(|v| v.as_u64()).unwrap_or(0) as u32,
                    completed: t.get("completed").and_then(|v| v.as_bool()).unwrap_or(false),
                })
                .collect()
        })
        .unwrap_or_default()
}

fn parse_submissions(value: &Value) -> Vec<SubmissionSummary> {
    value
        .as_array()
        .map(|arr| {
            arr.iter()
                .filter_map(|s| {
                    let submitted_at = s.get("submitted_at")?.as_str()?;
                    let submitted_at: DateTime<Utc> = submitted_at.parse().ok()?;
                    let passed = s.get("passed").and_then(|v| v.as_bool()).unwrap_or(false);
                    let score = s.get("score").and_then(|v| v.as_f64()).unwrap_or(0.0);
                    let time_spent_minutes = s.get("time_spent_minutes").and_then(|v| v.as_u64()).unwrap_or(0) as u32;
                    Some(SubmissionSummary { submitted_at, passed, score, time_spent_minutes })
                })
                .collect()
        })
        .unwrap_or_default()
}

impl ProgressTrackerAgent {
    pub fn new() -> Self {
        Self {
            breaker: CircuitBreaker::new(CircuitBreakerConfig {
                name: "progress_tracker".to_string(),
                ..CircuitBreakerConfig::default()
            }),
        }
    }

    fn plan_from_payload(&self, payload: &Payload) -> Result<PlanSummary, CoreError> {
        let created_at: DateTime<Utc> = payload
            .get("plan_created_at")
            .and_then(|v| v.as_str())
            .and_then(|s| s.parse().ok())
            .ok_or_else(|| CoreError::validation("no active learning plan found"))?;
        let total_days = payload.get("total_days").and_then(|v| v.as_u64()).unwrap_or(28) as u32;
        let tasks = parse_tasks(payload.get("tasks").unwrap_or(&Value::Null));
        Ok(PlanSummary { created_at, total_days, tasks })
    }

    fn metrics(&self, payload: &Payload) -> Result<AgentResult, CoreError> {
        let plan = self.plan_from_payload(payload)?;
        let submissions = parse_submissions(payload.get("submissions").unwrap_or(&Value::Null));
        let metrics = calculate_metrics(&plan, &submissions, Utc::now());
        Ok(AgentResult::success(serde_json::to_value(metrics).unwrap()))
    }

    fn get_daily_tasks(&self, payload: &Payload) -> Result<AgentResult, CoreError> {
        let plan = self.plan_from_payload(payload)?;
        let explicit_day_offset = payload.get("day_offset").and_then(|v| v.as_i64());
        let target_date: Option<DateTime<Utc>> = payload
            .get("target_date")
            .and_then(|v| v.as_str())
            .and_then(|s| s.parse().ok());
        let day_offset = resolve_day_offset(explicit_day_offset, target_date, plan.created_at, Utc::now());
        let tasks: Vec<_> = plan
            .tasks
            .iter()
            .filter(|t| t.day_offset as i64 == day_offset)
            .map(|t| json!({"day_offset": t.day_offset, "estimated_minutes": t.estimated_minutes, "completed": t.completed}))
            .collect();
        Ok(AgentResult::success(json!({ "day_offset": day_offset, "tasks": tasks })))
    }

    fn record_attempt(&self, payload: &Payload) -> Result<AgentResult, CoreError> {
        let Some(task_id) = payload.get("task_id").and_then(|v| v.as_str()) else {
            return Err(CoreError::validation("task_id is required"));
        };
        let passed = payload.get("passed").and_then(|v| v.as_bool()).unwrap_or(false);
        let score = payload.get("score").and_then(|v| v.as_f64()).unwrap_or(0.0);
        let prior_consecutive_failures = payload.get("prior_consecutive_failures").and_then(|v| v.as_u64()).unwrap_or(0) as u32;
        let attempt_number = payload.get("attempt_number").and_then(|v| v.as_u64()).unwrap_or(1) as u32;

        let consecutive_failures = if passed { 0 } else { prior_consecutive_failures + 1 };

        let mut triggers = Vec::new();
        triggers.extend(consecutive_failures_trigger(consecutive_failures, task_id, attempt_number));
        triggers.extend(per_submission_quick_success_trigger(passed, attempt_number, score, task_id));
        let triggers = prioritize(triggers);

        Ok(AgentResult::success(json!({
            "task_id": task_id,
            "attempt_count": attempt_number,
            "passed": passed,
            "score": score,
            "consecutive_failures": consecutive_failures,
            "adaptation_triggers": triggers,
            "needs_adaptation": !triggers.is_empty(),
        })))
    }

    fn detect_adaptation_triggers(&self, payload: &Payload) -> Result<AgentResult, CoreError> {
        let plan = self.plan_from_payload(payload)?;
        let submissions = parse_submissions(payload.get("submissions").unwrap_or(&Value::Null));
        let metrics = calculate_metrics(&plan, &submissions, Utc::now());
        let triggers = prioritize(aggregate_triggers(&metrics));
        let primary = triggers.first().cloned();
        Ok(AgentResult::success(json!({
            "triggers_detected": !triggers.is_empty(),
            "trigger_count": triggers.len(),
            "triggers": triggers,
            "primary_trigger": primary,
        })))
    }

    fn get_streak_info(&self, payload: &Payload) -> Result<AgentResult, CoreError> {
        let submissions = parse_submissions(payload.get("submissions").unwrap_or(&Value::Null));
        let days: Vec<_> = submissions.iter().map(|s| s.submitted_at).collect();
        let info = calculate_streak(&days, Utc::now());
        Ok(AgentResult::success(serde_json::to_value(info).unwrap()))
    }

    fn review_mistakes(&self, payload: &Payload) -> Result<AgentResult, CoreError> {
        let submissions = payload.get("submissions").and_then(|v| v.as_array()).cloned().unwrap_or_default();
        let failed: Vec<_> = submissions
            .into_iter()
            .filter(|s| !s.get("passed").and_then(|v| v.as_bool()).unwrap_or(true))
            .collect();
        Ok(AgentResult::success(json!({ "failed_submissions": failed })))
    }

    fn get_recommendations(&self, payload: &Payload) -> Result<AgentResult, CoreError> {
        let plan = self.plan_from_payload(payload)?;
        let submissions = parse_submissions(payload.get("submissions").unwrap_or(&Value::Null));
        let metrics = calculate_metrics(&plan, &submissions, Utc::now());
        let triggers = prioritize(aggregate_triggers(&metrics));
        let recommendation = triggers
            .first()
            .map(|t| t.recommended_action.clone())
            .unwrap_or_else(|| "continue_learning".to_string());
        Ok(AgentResult::success(json!({ "recommended_action": recommendation })))
    }
}

#[async_trait]
impl Agent for ProgressTrackerAgent {
    fn agent_type(&self) -> AgentType {
        AgentType::ProgressTracker
    }

    fn supported_intents(&self) -> HashSet<Intent> {
        HashSet::from([
            Intent::CheckProgress,
            Intent::GetDailyTasks,
            Intent::RecordAttempt,
            Intent::DetectAdaptationTriggers,
            Intent::GetProgressVisualization,
            Intent::ReviewMistakes,
            Intent::GetRecommendations,
            Intent::GetStreakInfo,
            Intent::CalculateMetrics,
        ])
    }

    async fn process(&self, _context: &Context, payload: &Payload) -> Result<AgentResult, CoreError> {
        match payload.intent {
            Some(Intent::CheckProgress) | Some(Intent::CalculateMetrics) | Some(Intent::GetProgressVisualization) => {
                self.metrics(payload)
            }
            Some(Intent::GetDailyTasks) => self.get_daily_tasks(payload),
            Some(Intent::RecordAttempt) => self.record_attempt(payload),
            Some(Intent::DetectAdaptationTriggers) => self.detect_adaptation_triggers(payload),
            Some(Intent::GetStreakInfo) => self.get_streak_info(payload),
            Some(Intent::ReviewMistakes) => self.review_mistakes(payload),
            Some(Intent::GetRecommendations) => self.get_recommendations(payload),
            _ => Err(CoreError::validation("unsupported intent for progress tracker")),
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
    async fn record_attempt_detects_consecutive_failures() {
        let agent = ProgressTrackerAgent::new();
        let payload = Payload::for_intent(Intent::RecordAttempt)
            .with_field("task_id", json!("t1"))
            .with_field("passed", json!(false))
            .with_field("prior_consecutive_failures", json!(1))
            .with_field("attempt_number", json!(2));
        let result = agent.process(&context(), &payload).await.unwrap();
        assert_eq!(result.data().unwrap()["needs_adaptation"], json!(true));
        assert_eq!(
            result.data().unwrap()["adaptation_triggers"][0]["trigger_type"],
            json!("consecutive_failures")
        );
    }

    #[tokio::test]
    async fn record_attempt_first_try_high_score_triggers_quick_success() {
        let agent = ProgressTrackerAgent::new();
        let payload = Payload::for_intent(Intent::RecordAttempt)
            .with_field("task_id", json!("t2"))
            .with_field("passed", json!(true))
            .with_field("score", json!(95.0))
            .with_field("attempt_number", json!(1));
        let result = agent.process(&context(), &payload).await.unwrap();
        assert_eq!(
            result.data().unwrap()["adaptation_triggers"][0]["trigger_type"],
            json!("quick_success")
        );
    }

    #[tokio::test]
    async fn metrics_without_an_active_plan_is_a_validation_error() {
        let agent = ProgressTrackerAgent::new();
        let err = agent
            .process(&context(), &Payload::for_intent(Intent::CalculateMetrics))
            .await
            .unwrap_err();
        assert!(err.is_validation());
    }
}
