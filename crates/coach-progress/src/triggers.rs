//! Adaptation trigger detection and prioritization.
//!
//! Thresholds are explicit constants, not learned — predictable adaptation
//! is a product requirement for a teaching tool.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::metrics::ProgressMetrics;

pub const CONSECUTIVE_FAILURE_THRESHOLD: u32 = 2;
pub const QUICK_SUCCESS_THRESHOLD: f64 = 1.2;
pub const LOW_SUCCESS_RATE_THRESHOLD: f64 = 0.5;
pub const HIGH_SUCCESS_RATE_THRESHOLD: f64 = 0.9;
pub const HIGH_SUCCESS_RATE_MIN_SUBMISSIONS: u32 = 5;
pub const SLOW_PROGRESS_GAP: f64 = 20.0;
pub const QUICK_SUCCESS_MIN_COMPLETED_TASKS: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    High,
    Medium,
    Low,
}

impl Severity {
    fn rank(self) -> u8 {
        match self {
            Severity::High => 0,
            Severity::Medium => 1,
            Severity::Low => 2,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdaptationTrigger {
    pub trigger_type: String,
    pub severity: Severity,
    pub confidence: f64,
    pub recommended_action: String,
    pub details: Value,
}

/// Per-submission trigger: N consecutive failures on the same task.
/// `consecutive_failures` already includes the attempt just recorded.
pub fn consecutive_failures_trigger(consecutive_failures: u32, task_id: &str, total_attempts: u32) -> Option<AdaptationTrigger> {
    if consecutive_failures < CONSECUTIVE_FAILURE_THRESHOLD {
        return None;
    }
    Some(AdaptationTrigger {
        trigger_type: "consecutive_failures".to_string(),
        severity: Severity::High,
        confidence: 0.95,
        recommended_action: "reduce_difficulty_and_recap".to_string(),
        details: json!({
            "consecutive_failures": consecutive_failures,
            "task_id": task_id,
            "total_attempts": total_attempts,
        }),
    })
}

/// Per-submission trigger: passed on the first attempt with a high score.
pub fn per_submission_quick_success_trigger(passed: bool, attempt_number: u32, score: f64, task_id: &str) -> Option<AdaptationTrigger> {
    if !(passed && attempt_number == 1 && score >= 90.0) {
        return None;
    }
    Some(AdaptationTrigger {
        trigger_type: "quick_success".to_string(),
        severity: Severity::Low,
        confidence: 0.8,
        recommended_action: "add_stretch_task".to_string(),
        details: json!({"score": score, "task_id": task_id}),
    })
}

/// Aggregate triggers derived from plan-wide metrics: low/high success
/// rate, the aggregate form of quick_success, and slow progress.
pub fn aggregate_triggers(metrics: &ProgressMetrics) -> Vec<AdaptationTrigger> {
    let mut triggers = Vec::new();

    if metrics.success_rate < LOW_SUCCESS_RATE_THRESHOLD * 100.0 {
        triggers.push(AdaptationTrigger {
            trigger_type: "low_success_rate".to_string(),
            severity: Severity::High,
            confidence: 0.9,
            recommended_action: "reduce_difficulty".to_string(),
            details: json!({
                "success_rate": metrics.success_rate,
                "threshold": LOW_SUCCESS_RATE_THRESHOLD * 100.0,
            }),
        });
    }

    if metrics.success_rate > HIGH_SUCCESS_RATE_THRESHOLD * 100.0 && metrics.total_submissions >= HIGH_SUCCESS_RATE_MIN_SUBMISSIONS {
        triggers.push(AdaptationTrigger {
            trigger_type: "high_success_rate".to_string(),
            severity: Severity::Low,
            confidence: 0.85,
            recommended_action: "increase_difficulty".to_string(),
            details: json!({
                "success_rate": metrics.success_rate,
                "threshold": HIGH_SUCCESS_RATE_THRESHOLD * 100.0,
            }),
        });
    }

    if metrics.average_attempts_per_task < QUICK_SUCCESS_THRESHOLD && metrics.completed_tasks >= QUICK_SUCCESS_MIN_COMPLETED_TASKS {
        triggers.push(AdaptationTrigger {
            trigger_type: "quick_success".to_string(),
            severity: Severity::Low,
            confidence: 0.8,
            recommended_action: "add_stretch_task".to_string(),
            details: json!({
                "average_attempts": metrics.average_attempts_per_task,
                "threshold": QUICK_SUCCESS_THRESHOLD,
            }),
        });
    }

    if metrics.completion_rate < metrics.expected_completion - SLOW_PROGRESS_GAP {
        triggers.push(AdaptationTrigger {
            trigger_type: "slow_progress".to_string(),
            severity: Severity::Medium,
            confidence: 0.75,
            recommended_action: "adjust_pacing".to_string(),
            details: json!({
                "actual_completion": metrics.completion_rate,
                "expected_completion": metrics.expected_completion,
            }),
        });
    }

    triggers
}

/// Sorts by severity (high < medium < low), then by descending confidence.
pub fn prioritize(mut triggers: Vec<AdaptationTrigger>) -> Vec<AdaptationTrigger> {
    triggers.sort_by(|a, b| {
        a.severity
            .rank()
            .cmp(&b.severity.rank())
            .then(b.confidence.partial_cmp(&a.confidence).unwrap_or(std::cmp::Ordering::Equal))
    });
    triggers
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics(success_rate: f64, total_submissions: u32, completion_rate: f64, expected_completion: f64, avg_attempts: f64, completed_tasks: u32) -> ProgressMetrics {
        ProgressMetrics {
            completion_rate,
            success_rate,
            average_score: 0.0,
            average_attempts_per_task: avg_attempts,
            expected_completion,
            streak_days: 0,
            longest_streak: 0,
            streak_at_risk: false,
            days_until_streak_lost: 0,
            total_submissions,
            passed_submissions: 0,
            failed_submissions: 0,
            completed_tasks,
            total_tasks: 10,
            time_spent_minutes: 0,
            last_activity_date: None,
        }
    }

    #[test]
    fn low_success_rate_fires_below_fifty_percent() {
        let m = metrics(40.0, 10, 0.0, 0.0, 0.0, 0);
        let triggers = aggregate_triggers(&m);
        assert!(triggers.iter().any(|t| t.trigger_type == "low_success_rate"));
    }

    #[test]
    fn high_success_rate_requires_minimum_submissions() {
        let m = metrics(95.0, 3, 0.0, 0.0, 0.0, 0);
        assert!(!aggregate_triggers(&m).iter().any(|t| t.trigger_type == "high_success_rate"));
        let m = metrics(95.0, 5, 0.0, 0.0, 0.0, 0);
        assert!(aggregate_triggers(&m).iter().any(|t| t.trigger_type == "high_success_rate"));
    }

    #[test]
    fn slow_progress_requires_a_twenty_point_gap() {
        let m = metrics(70.0, 10, 40.0, 55.0, 1.0, 5);
        assert!(!aggregate_triggers(&m).iter().any(|t| t.trigger_type == "slow_progress"));
        let m = metrics(70.0, 10, 30.0, 55.0, 1.0, 5);
        assert!(aggregate_triggers(&m).iter().any(|t| t.trigger_type == "slow_progress"));
    }

    #[test]
    fn two_consecutive_failures_meets_threshold() {
        assert!(consecutive_failures_trigger(1, "t1", 1).is_none());
        assert!(consecutive_failures_trigger(2, "t1", 2).is_some());
    }

    #[test]
    fn prioritize_orders_by_severity_then_confidence() {
        let triggers = vec![
            AdaptationTrigger { trigger_type: "a".into(), severity: Severity::Low, confidence: 0.9, recommended_action: "x".into(), details: json!({}) },
            AdaptationTrigger { trigger_type: "b".into(), severity: Severity::High, confidence: 0.5, recommended_action: "y".into(), details: json!({}) },
            AdaptationTrigger { trigger_type: "c".into(), severity: Severity::High, confidence: 0.95, recommended_action: "z".into(), details: json!({}) },
        ];
        let ordered = prioritize(triggers);
        assert_eq!(ordered[0].trigger_type, "c");
        assert_eq!(ordered[1].trigger_type, "b");
        assert_eq!(ordered[2].trigger_type, "a");
    }
}
