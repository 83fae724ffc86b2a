//! The declarative workflow engine: a fixed catalog of named, ordered step
//! lists, each step bound to `(agent_type, intent)`.
//!
//! Two function-pointer hooks keep steps data-driven without reaching for
//! closures the catalog would have to own: `payload_transform` builds a
//! step's payload from the context, the orchestrator's original incoming
//! payload, and every prior step's output; `run_if` makes a step
//! conditional on those same prior outputs (used by `exercise_submission`'s
//! adaptation branch — a step skipped this way is recorded as `None` and
//! never invokes an agent).

use coach_contracts::{AgentType, Intent, Payload};
use coach_errors::{AgentResult, Context};

pub type PayloadTransform = fn(&Context, &Payload, &[Option<AgentResult>]) -> Payload;
pub type RunPredicate = fn(&[Option<AgentResult>]) -> bool;

#[derive(Clone, Copy)]
pub enum OnFailure {
    Abort,
    Continue,
    Fallback(Intent),
}

pub struct Step {
    pub agent_type: AgentType,
    pub intent: Intent,
    pub on_failure: OnFailure,
    pub timeout: Option<std::time::Duration>,
    pub payload_transform: Option<PayloadTransform>,
    pub run_if: Option<RunPredicate>,
}

impl Step {
    pub const fn new(agent_type: AgentType, intent: Intent) -> Self {
        Self {
            agent_type,
            intent,
            on_failure: OnFailure::Abort,
            timeout: None,
            payload_transform: None,
            run_if: None,
        }
    }

    pub const fn on_failure(mut self, policy: OnFailure) -> Self {
        self.on_failure = policy;
        self
    }

    pub const fn transform(mut self, f: PayloadTransform) -> Self {
        self.payload_transform = Some(f);
        self
    }

    pub const fn run_if(mut self, f: RunPredicate) -> Self {
        self.run_if = Some(f);
        self
    }
}

pub struct Workflow {
    pub name: &'static str,
    pub steps: &'static [Step],
}

fn json_of(result: &Option<AgentResult>) -> serde_json::Value {
    result.as_ref().and_then(|r| r.data()).cloned().unwrap_or(serde_json::Value::Null)
}

/// Pulls `field` out of step `index`'s output data, if that step ran and
/// succeeded and its data is an object carrying that key.
pub fn prior_field(prior: &[Option<AgentResult>], index: usize, field: &str) -> Option<serde_json::Value> {
    prior.get(index).and_then(|o| o.as_ref()).and_then(|r| r.data()).and_then(|d| d.get(field)).cloned()
}

pub fn prior_data(prior: &[Option<AgentResult>], index: usize) -> serde_json::Value {
    prior.get(index).map(json_of).unwrap_or(serde_json::Value::Null)
}

// --- Catalog -----------------------------------------------------------

static NEW_LEARNER_ONBOARDING_STEPS: &[Step] = &[
    Step::new(AgentType::Profile, Intent::AssessSkillLevel),
    Step::new(AgentType::Profile, Intent::UpdateGoals),
    Step::new(AgentType::Profile, Intent::SetConstraints),
    Step::new(AgentType::CurriculumPlanner, Intent::CreateLearningPath),
];

fn exercise_submission_record_attempt(
    _context: &Context,
    original: &Payload,
    prior: &[Option<AgentResult>],
) -> Payload {
    let mut payload = Payload::for_intent(Intent::RecordAttempt);
    if let Some(task_id) = prior_field(prior, 0, "task_id") {
        payload.data.insert("task_id".to_string(), task_id);
    }
    if let Some(passed) = prior_field(prior, 0, "passed") {
        payload.data.insert("passed".to_string(), passed);
    }
    if let Some(score) = prior_field(prior, 0, "score") {
        payload.data.insert("score".to_string(), score);
    }
    if let Some(attempt_number) = original.get("attempt_number") {
        payload.data.insert("attempt_number".to_string(), attempt_number.clone());
    }
    if let Some(prior_failures) = original.get("prior_consecutive_failures") {
        payload.data.insert("prior_consecutive_failures".to_string(), prior_failures.clone());
    }
    payload
}

fn exercise_submission_needs_adaptation(prior: &[Option<AgentResult>]) -> bool {
    prior_field(prior, 2, "triggers_detected").and_then(|v| v.as_bool()).unwrap_or(false)
}

fn exercise_submission_adapt_difficulty(
    _context: &Context,
    _original: &Payload,
    prior: &[Option<AgentResult>],
) -> Payload {
    let action = prior_field(prior, 2, "primary_trigger")
        .and_then(|t| t.get("recommended_action").cloned())
        .and_then(|v| v.as_str().map(str::to_string))
        .unwrap_or_else(|| "reduce_difficulty".to_string());
    let direction = if action.contains("increase") { "increase" } else { "reduce" };
    Payload::for_intent(Intent::AdaptDifficulty).with_field("direction", serde_json::json!(direction))
}

static EXERCISE_SUBMISSION_STEPS: &[Step] = &[
    Step::new(AgentType::Reviewer, Intent::EvaluateSubmission),
    Step::new(AgentType::ProgressTracker, Intent::RecordAttempt).transform(exercise_submission_record_attempt),
    Step::new(AgentType::ProgressTracker, Intent::DetectAdaptationTriggers),
    Step::new(AgentType::CurriculumPlanner, Intent::AdaptDifficulty)
        .on_failure(OnFailure::Continue)
        .run_if(exercise_submission_needs_adaptation)
        .transform(exercise_submission_adapt_difficulty),
];

static RESOURCE_DISCOVERY_STEPS: &[Step] = &[
    Step::new(AgentType::Resources, Intent::SearchResources),
    Step::new(AgentType::Resources, Intent::VerifyResourceQuality),
    Step::new(AgentType::Resources, Intent::RecommendResources),
];

pub const CATALOG: &[Workflow] = &[
    Workflow { name: "new_learner_onboarding", steps: NEW_LEARNER_ONBOARDING_STEPS },
    Workflow { name: "exercise_submission", steps: EXERCISE_SUBMISSION_STEPS },
    Workflow { name: "resource_discovery", steps: RESOURCE_DISCOVERY_STEPS },
];

pub fn find(name: &str) -> Option<&'static Workflow> {
    CATALOG.iter().find(|w| w.name == name)
}
