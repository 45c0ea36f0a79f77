//! Engagement handlers - turns, report delivery and statistics.

mod dispatch_report;
mod get_engagement_stats;
mod process_turn;

pub use dispatch_report::DispatchReportHandler;
pub use get_engagement_stats::{EngagementStats, GetEngagementStatsHandler};
pub use process_turn::{
    ProcessTurnCommand, ProcessTurnHandler, ProcessTurnResult, ReplySource, TurnSettings,
};
