//! The coordination core's configuration surface.
//!
//! Enumerated, not open-ended: these seven keys are the only options the
//! core recognizes. Loaded with the `config` crate layered default <- file
//! <- environment (`COACH_*`, double-underscore nesting), the way a host
//! would normally wire up a twelve-factor service.

use coach_errors::CoreError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BreakerSettings {
    pub failure_threshold: u32,
    pub recovery_timeout_seconds: u64,
    pub success_threshold: u32,
    pub default_timeout_seconds: u64,
}

impl Default for BreakerSettings {
    fn default() -> Self {
        Self {
            failure_threshold: 5,
            recovery_timeout_seconds: 60,
            success_threshold: 3,
            default_timeout_seconds: 30,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouterSettings {
    pub min_confidence: f64,
    /// Product-tunable minimum for the `low_success_rate` trigger, added
    /// to the configuration surface rather than hard-coded (an open
    /// question in the distilled spec resolved this way).
    pub low_success_rate_min_submissions: u32,
    pub quick_success_min_completed_tasks: u32,
}

impl Default for RouterSettings {
    fn default() -> Self {
        Self {
            min_confidence: 0.3,
            low_success_rate_min_submissions: 1,
            quick_success_min_completed_tasks: 3,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowSettings {
    pub enabled: Vec<String>,
}

impl Default for WorkflowSettings {
    fn default() -> Self {
        Self {
            enabled: vec![
                "new_learner_onboarding".to_string(),
                "exercise_submission".to_string(),
                "resource_discovery".to_string(),
            ],
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CoachConfig {
    pub breaker: BreakerSettings,
    pub router: RouterSettings,
    pub workflows: WorkflowSettings,
}

impl CoachConfig {
    /// Loads configuration from, in ascending priority: compiled-in
    /// defaults, an optional `config/default.toml` (or `.yaml`/`.json`),
    /// and `COACH_*` environment variables (`COACH_BREAKER__FAILURE_THRESHOLD`).
    pub fn load() -> Result<Self, CoreError> {
        let defaults = CoachConfig::default();
        let builder = config::Config::builder()
            .set_default("breaker.failure_threshold", defaults.breaker.failure_threshold as i64)
            .map_err(config_error)?
            .set_default("breaker.recovery_timeout_seconds", defaults.breaker.recovery_timeout_seconds as i64)
            .map_err(config_error)?
            .set_default("breaker.success_threshold", defaults.breaker.success_threshold as i64)
            .map_err(config_error)?
            .set_default("breaker.default_timeout_seconds", defaults.breaker.default_timeout_seconds as i64)
            .map_err(config_error)?
            .set_default("router.min_confidence", defaults.router.min_confidence)
            .map_err(config_error)?
            .set_default(
                "router.low_success_rate_min_submissions",
                defaults.router.low_success_rate_min_submissions as i64,
            )
            .map_err(config_error)?
            .set_default(
                "router.quick_success_min_completed_tasks",
                defaults.router.quick_success_min_completed_tasks as i64,
            )
            .map_err(config_error)?
            .set_default("workflows.enabled", defaults.workflows.enabled.clone())
            .map_err(config_error)?
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::Environment::with_prefix("COACH").separator("__"));

        let settled = builder.build().map_err(config_error)?;
        settled.try_deserialize().map_err(config_error)
    }
}

fn config_error(err: config::ConfigError) -> CoreError {
    CoreError::validation(format!("configuration error: {err}"))
}
