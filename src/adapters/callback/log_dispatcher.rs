//! Log-only Report Dispatcher - used when no callback URL is configured.
//!
//! Writes the report to the log and reports a transport failure, so the
//! conversation stays registered and keeps engaging.

use async_trait::async_trait;

use crate::domain::engagement::Report;
use crate::ports::{DeliveryOutcome, DispatchError, ReportDispatcher};

#[derive(Debug, Clone, Copy, Default)]
pub struct LogOnlyReportDispatcher;

impl LogOnlyReportDispatcher {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ReportDispatcher for LogOnlyReportDispatcher {
    async fn dispatch(&self, report: &Report) -> DeliveryOutcome {
        let payload = serde_json::to_string(report).unwrap_or_default();
        tracing::info!(
            session_id = %report.session_id,
            payload = %payload,
            "callback url not configured, report logged only"
        );
        DeliveryOutcome::TransportFailure(DispatchError::NotConfigured)
    }

    fn name(&self) -> &'static str {
        "log-only"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::ConversationId;
    use crate::domain::intelligence::ArtifactSet;

    #[tokio::test]
    async fn never_reports_delivery() {
        let report = Report::new(ConversationId::new("s").unwrap(), &ArtifactSet::new(), 1, &[]);
        let outcome = LogOnlyReportDispatcher::new().dispatch(&report).await;
        assert_eq!(
            outcome,
            DeliveryOutcome::TransportFailure(DispatchError::NotConfigured)
        );
    }
}
