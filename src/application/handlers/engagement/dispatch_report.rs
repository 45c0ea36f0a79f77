//! DispatchReportHandler - delivers a report and settles the conversation.
//!
//! Runs outside the turn that triggered it. The agent is only locked to
//! record the outcome, never while the dispatcher is talking to the remote
//! side, so the conversation keeps answering in the meantime.

use std::sync::Arc;

use tokio::task::JoinHandle;

use crate::application::registry::{SessionRegistry, SharedAgent};
use crate::domain::engagement::Report;
use crate::ports::{DeliveryOutcome, DispatchError, ReportDispatcher};

/// Handler for report delivery.
pub struct DispatchReportHandler {
    dispatcher: Arc<dyn ReportDispatcher>,
    registry: Arc<SessionRegistry>,
}

impl DispatchReportHandler {
    pub fn new(dispatcher: Arc<dyn ReportDispatcher>, registry: Arc<SessionRegistry>) -> Self {
        Self {
            dispatcher,
            registry,
        }
    }

    /// Attempts delivery once, then retires the conversation on success or
    /// re-arms it for the next qualifying turn on failure.
    pub async fn handle(&self, agent: SharedAgent, report: Report) -> DeliveryOutcome {
        let outcome = self.attempt(&report).await;
        let id = report.session_id;

        let settled = {
            let mut guard = agent.lock().await;
            if outcome.is_delivered() {
                guard.report_delivered()
            } else {
                guard.report_failed()
            }
        };

        if let Err(err) = settled {
            tracing::error!(session_id = %id, error = %err, "report outcome could not be recorded");
        }

        if outcome.is_delivered() {
            self.registry.retire_agent(&id, &agent).await;
            tracing::info!(
                session_id = %id,
                dispatcher = self.dispatcher.name(),
                "conversation reported and retired"
            );
        } else {
            tracing::warn!(
                session_id = %id,
                dispatcher = self.dispatcher.name(),
                outcome = ?outcome,
                "report not delivered, conversation stays active"
            );
        }

        outcome
    }

    /// One dispatcher call on its own task; a panic there counts as a
    /// transport failure so the agent is still re-armed.
    async fn attempt(&self, report: &Report) -> DeliveryOutcome {
        let dispatcher = Arc::clone(&self.dispatcher);
        let payload = report.clone();
        match tokio::spawn(async move { dispatcher.dispatch(&payload).await }).await {
            Ok(outcome) => outcome,
            Err(err) => DeliveryOutcome::TransportFailure(DispatchError::Aborted(err.to_string())),
        }
    }

    /// Runs [`handle`](Self::handle) on a background task.
    pub fn spawn(self: &Arc<Self>, agent: SharedAgent, report: Report) -> JoinHandle<DeliveryOutcome> {
        let handler = Arc::clone(self);
        tokio::spawn(async move { handler.handle(agent, report).await })
    }
}
