//! Mock Report Dispatcher for testing.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::domain::engagement::Report;
use crate::ports::{DeliveryOutcome, ReportDispatcher};

/// Records every report and answers with queued outcomes.
///
/// Once the queue is empty every dispatch is `Delivered`.
#[derive(Debug, Clone, Default)]
pub struct MockReportDispatcher {
    outcomes: Arc<Mutex<VecDeque<DeliveryOutcome>>>,
    reports: Arc<Mutex<Vec<Report>>>,
    delay: Duration,
    panic_next: Arc<AtomicBool>,
}

impl MockReportDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues the outcome for the next dispatch.
    pub fn with_outcome(self, outcome: DeliveryOutcome) -> Self {
        self.outcomes.lock().unwrap().push_back(outcome);
        self
    }

    /// Makes the next dispatch panic after recording the report.
    pub fn with_panic(self) -> Self {
        self.panic_next.store(true, Ordering::SeqCst);
        self
    }

    /// Sets simulated latency per dispatch.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Reports received so far.
    pub fn reports(&self) -> Vec<Report> {
        self.reports.lock().unwrap().clone()
    }

    pub fn dispatch_count(&self) -> usize {
        self.reports.lock().unwrap().len()
    }
}

#[async_trait]
impl ReportDispatcher for MockReportDispatcher {
    async fn dispatch(&self, report: &Report) -> DeliveryOutcome {
        self.reports.lock().unwrap().push(report.clone());

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        if self.panic_next.swap(false, Ordering::SeqCst) {
            panic!("mock dispatcher panic");
        }

        self.outcomes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(DeliveryOutcome::Delivered)
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}
