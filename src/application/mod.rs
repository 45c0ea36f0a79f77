//! Application layer - Commands, Queries, and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! The [`SessionRegistry`] is the only shared mutable state in the process.

pub mod handlers;
pub mod registry;

pub use handlers::{
    DispatchReportHandler, EngagementStats, GetEngagementStatsHandler, ProcessTurnCommand,
    ProcessTurnHandler, ProcessTurnResult, ReplySource, TurnSettings,
};
pub use registry::{RegistryConfig, RegistryError, SessionRegistry, SharedAgent};
