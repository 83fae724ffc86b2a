//! Derived progress metrics for a user's active learning plan.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::streak::{calculate_streak, StreakInfo};

#[derive(Debug, Clone, Copy)]
pub struct TaskSummary {
    pub day_offset: u32,
    pub estimated_minutes: u32,
    pub completed: bool,
}

#[derive(Debug, Clone)]
pub struct PlanSummary {
    pub created_at: DateTime<Utc>,
    pub total_days: u32,
    pub tasks: Vec<TaskSummary>,
}

#[derive(Debug, Clone, Copy)]
pub struct SubmissionSummary {
    pub submitted_at: DateTime<Utc>,
    pub passed: bool,
    pub score: f64,
    pub time_spent_minutes: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressMetrics {
    pub completion_rate: f64,
    pub success_rate: f64,
    pub average_score: f64,
    pub average_attempts_per_task: f64,
    pub expected_completion: f64,
    pub streak_days: u32,
    pub longest_streak: u32,
    pub streak_at_risk: bool,
    pub days_until_streak_lost: u32,
    pub total_submissions: u32,
    pub passed_submissions: u32,
    pub failed_submissions: u32,
    pub completed_tasks: u32,
    pub total_tasks: u32,
    pub time_spent_minutes: u32,
    pub last_activity_date: Option<DateTime<Utc>>,
}

pub fn calculate_metrics(
    plan: &PlanSummary,
    submissions: &[SubmissionSummary],
    now: DateTime<Utc>,
) -> ProgressMetrics {
    let total_tasks = plan.tasks.len() as u32;
    let completed_tasks = plan.tasks.iter().filter(|t| t.completed).count() as u32;
    let total_submissions = submissions.len() as u32;
    let passed_submissions = submissions.iter().filter(|s| s.passed).count() as u32;
    let failed_submissions = total_submissions - passed_submissions;
    let time_spent_minutes = submissions.iter().map(|s| s.time_spent_minutes).sum();
    let last_activity_date = submissions.iter().map(|s| s.submitted_at).max();

    let completion_rate = if total_tasks > 0 {
        completed_tasks as f64 / total_tasks as f64 * 100.0
    } else {
        0.0
    };
    let success_rate = if total_submissions > 0 {
        passed_submissions as f64 / total_submissions as f64 * 100.0
    } else {
        0.0
    };
    let average_score = if total_submissions > 0 {
        submissions.iter().map(|s| s.score).sum::<f64>() / total_submissions as f64
    } else {
        0.0
    };
    let average_attempts_per_task = if completed_tasks > 0 {
        total_submissions as f64 / completed_tasks as f64
    } else {
        0.0
    };

    let elapsed_days = (now - plan.created_at).num_days().max(0) as f64;
    let expected_completion = if plan.total_days > 0 {
        (elapsed_days / plan.total_days as f64 * 100.0).clamp(0.0, 100.0)
    } else {
        0.0
    };

    let submission_days: Vec<DateTime<Utc>> = submissions.iter().map(|s| s.submitted_at).collect();
    let StreakInfo {
        current_streak,
        longest_streak,
        streak_at_risk,
        days_until_streak_lost,
    } = calculate_streak(&submission_days, now);

    ProgressMetrics {
        completion_rate,
        success_rate,
        average_score,
        average_attempts_per_task,
        expected_completion,
        streak_days: current_streak,
        longest_streak,
        streak_at_risk,
        days_until_streak_lost,
        total_submissions,
        passed_submissions,
        failed_submissions,
        completed_tasks,
        total_tasks,
        time_spent_minutes,
        last_activity_date,
    }
}

/// Resolves the day offset a `get_daily_tasks`-style request targets.
/// Precedence: explicit `day_offset` > `target_date` > elapsed days since
/// the plan was created.
pub fn resolve_day_offset(
    explicit_day_offset: Option<i64>,
    target_date: Option<DateTime<Utc>>,
    plan_created_at: DateTime<Utc>,
    now: DateTime<Utc>,
) -> i64 {
    if let Some(offset) = explicit_day_offset {
        return offset.max(0);
    }
    if let Some(target) = target_date {
        return (target - plan_created_at).num_days().max(0);
    }
    (now - plan_created_at).num_days().max(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn plan(now: DateTime<Utc>, total_days: u32, tasks: Vec<TaskSummary>) -> PlanSummary {
        PlanSummary {
            created_at: now - Duration::days(total_days as i64 / 2),
            total_days,
            tasks,
        }
    }

    #[test]
    fn zero_tasks_and_submissions_yield_zeroed_rates() {
        let now = Utc::now();
        let plan = plan(now, 10, vec![]);
        let metrics = calculate_metrics(&plan, &[], now);
        assert_eq!(metrics.completion_rate, 0.0);
        assert_eq!(metrics.success_rate, 0.0);
        assert_eq!(metrics.average_attempts_per_task, 0.0);
    }

    #[test]
    fn completion_and_success_rates_are_percentages() {
        let now = Utc::now();
        let plan = plan(
            now,
            10,
            vec![
                TaskSummary { day_offset: 0, estimated_minutes: 10, completed: true },
                TaskSummary { day_offset: 1, estimated_minutes: 10, completed: false },
            ],
        );
        let submissions = vec![
            SubmissionSummary { submitted_at: now, passed: true, score: 90.0, time_spent_minutes: 15 },
            SubmissionSummary { submitted_at: now, passed: false, score: 40.0, time_spent_minutes: 20 },
        ];
        let metrics = calculate_metrics(&plan, &submissions, now);
        assert_eq!(metrics.completion_rate, 50.0);
        assert_eq!(metrics.success_rate, 50.0);
        assert_eq!(metrics.average_score, 65.0);
        assert_eq!(metrics.passed_submissions, 1);
        assert_eq!(metrics.failed_submissions, 1);
        assert_eq!(metrics.time_spent_minutes, 35);
        assert_eq!(metrics.last_activity_date, Some(now));
    }

    #[test]
    fn day_offset_precedence_prefers_explicit_then_target_then_elapsed() {
        let now = Utc::now();
        let created = now - Duration::days(5);
        assert_eq!(resolve_day_offset(Some(2), Some(now), created, now), 2);
        assert_eq!(resolve_day_offset(None, Some(created + Duration::days(3)), created, now), 3);
        assert_eq!(resolve_day_offset(None, None, created, now), 5);
    }
}
