//! Typed errors, the uniform `AgentResult`, and the per-request `Context`
//! shared by every learning-coach coordination component.

pub mod context;
pub mod error;
pub mod result;

pub use context::{Context, SkillLevel};
pub use error::{CoreError, ErrorCode};
pub use result::AgentResult;
