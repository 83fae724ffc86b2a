//! Deterministic intent routing: a static `Intent -> AgentType` table plus
//! a keyword-scored free-text classifier. No learned weights, no LLM —
//! auditable by reading `classifier::KEYWORD_TABLE`.

pub mod classifier;
pub mod table;

pub use classifier::{classify, Classification};
pub use table::{intent_from_str, route_intent, route_intent_string};
