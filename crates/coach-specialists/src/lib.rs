//! The six specialist agents, specified at the contract level: agent type,
//! accepted intents, and required fallbacks. Domain content (real exercise
//! banks, real documentation search, ...) is template/content work and
//! stays out of this core.

pub mod curriculum_planner;
pub mod exercise_generator;
pub mod profile;
pub mod progress_tracker;
pub mod resources;
pub mod reviewer;

pub use curriculum_planner::CurriculumPlannerAgent;
pub use exercise_generator::ExerciseGeneratorAgent;
pub use profile::ProfileAgent;
pub use progress_tracker::ProgressTrackerAgent;
pub use resources::ResourcesAgent;
pub use reviewer::ReviewerAgent;
