//! Mode dispatch (named workflow / explicit intent / free-text classification)
//! and the declarative workflow engine that runs the three named workflows.

pub mod orchestrator;
pub mod workflow;

pub use orchestrator::Orchestrator;
pub use workflow::{OnFailure, Step, Workflow, CATALOG};
