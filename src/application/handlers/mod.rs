//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations.

pub mod engagement;

pub use engagement::{
    DispatchReportHandler, EngagementStats, GetEngagementStatsHandler, ProcessTurnCommand,
    ProcessTurnHandler, ProcessTurnResult, ReplySource, TurnSettings,
};
