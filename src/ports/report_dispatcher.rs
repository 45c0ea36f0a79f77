//! Report Dispatcher Port - Delivery of finished intelligence reports.
//!
//! A dispatcher makes exactly one delivery attempt per call. Retrying is
//! the caller's business: a failed delivery leaves the conversation
//! registered so the next qualifying turn can try again.

use async_trait::async_trait;

use crate::domain::engagement::Report;

/// Port for handing a report to the external evaluator.
#[async_trait]
pub trait ReportDispatcher: Send + Sync {
    /// Attempt one delivery of `report`.
    ///
    /// Never fails: every problem is folded into the returned outcome.
    async fn dispatch(&self, report: &Report) -> DeliveryOutcome;

    /// Short name for logs (e.g., "http", "log-only").
    fn name(&self) -> &'static str;
}

/// Result of one delivery attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryOutcome {
    /// The remote side accepted the report.
    Delivered,
    /// The remote side answered but refused the report.
    Rejected { status: u16, body: String },
    /// The report never reached the remote side.
    TransportFailure(DispatchError),
}

impl DeliveryOutcome {
    /// Returns true if the owning conversation may be retired.
    pub fn is_delivered(&self) -> bool {
        matches!(self, DeliveryOutcome::Delivered)
    }
}

/// Transport-level reasons a report did not arrive.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DispatchError {
    /// No endpoint is configured.
    #[error("no callback endpoint configured")]
    NotConfigured,

    /// The request did not complete in time.
    #[error("delivery timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    /// Connection or protocol failure.
    #[error("network error: {0}")]
    Network(String),

    /// The report could not be encoded.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// The dispatcher itself failed before producing an outcome.
    #[error("dispatch aborted: {0}")]
    Aborted(String),
}
