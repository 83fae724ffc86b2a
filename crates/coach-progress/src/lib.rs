//! The progress adaptation engine: derived metrics, streak calculation,
//! and adaptation trigger detection/prioritization.

pub mod metrics;
pub mod streak;
pub mod triggers;

pub use metrics::{calculate_metrics, resolve_day_offset, PlanSummary, ProgressMetrics, SubmissionSummary, TaskSummary};
pub use streak::{calculate_streak, StreakInfo};
pub use triggers::{
    aggregate_triggers, consecutive_failures_trigger, per_submission_quick_success_trigger, prioritize,
    AdaptationTrigger, Severity,
};
