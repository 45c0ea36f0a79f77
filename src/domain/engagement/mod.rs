//! Engagement module - one conversation with a scammer.
//!
//! The [`ConversationAgent`] aggregate folds turns into intelligence,
//! decides when to stop and produces the final [`Report`].

mod agent;
mod history;
pub mod persona;
mod report;
mod status;

pub use agent::{ConversationAgent, DEFAULT_MAX_TURNS};
pub use history::{HistoryTurn, Speaker};
pub use report::{Report, DEFAULT_AGENT_NOTES};
pub use status::EngagementStatus;
