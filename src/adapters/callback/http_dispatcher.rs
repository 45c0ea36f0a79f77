//! HTTP Report Dispatcher - POSTs reports to the evaluator's callback URL.

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use crate::domain::engagement::Report;
use crate::ports::{DeliveryOutcome, DispatchError, ReportDispatcher};

/// Longest slice of a rejection body kept for logs.
const MAX_BODY_EXCERPT: usize = 512;

/// Delivers reports as a single JSON POST per attempt.
pub struct HttpReportDispatcher {
    url: String,
    timeout: Duration,
    client: Client,
}

impl HttpReportDispatcher {
    /// Creates a dispatcher for `url` with a per-request timeout.
    pub fn new(url: impl Into<String>, timeout: Duration) -> Self {
        // Requests also carry the timeout, so the fallback client stays bounded.
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|err| {
                tracing::warn!(error = %err, "HTTP client build failed, using default client");
                Client::new()
            });

        Self {
            url: url.into(),
            timeout,
            client,
        }
    }

    /// Returns the target URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    fn transport_error(&self, err: reqwest::Error) -> DispatchError {
        if err.is_timeout() {
            DispatchError::Timeout {
                timeout_secs: self.timeout.as_secs(),
            }
        } else if err.is_builder() {
            DispatchError::Serialization(err.to_string())
        } else {
            DispatchError::Network(err.to_string())
        }
    }
}

#[async_trait]
impl ReportDispatcher for HttpReportDispatcher {
    async fn dispatch(&self, report: &Report) -> DeliveryOutcome {
        let response = match self
            .client
            .post(&self.url)
            .timeout(self.timeout)
            .json(report)
            .send()
            .await {
            Ok(response) => response,
            Err(err) => {
                let err = self.transport_error(err);
                tracing::warn!(
                    session_id = %report.session_id,
                    error = %err,
                    "report delivery failed"
                );
                return DeliveryOutcome::TransportFailure(err);
            }
        };

        let status = response.status();
        if status.is_success() {
            tracing::info!(
                session_id = %report.session_id,
                status = status.as_u16(),
                "report delivered"
            );
            return DeliveryOutcome::Delivered;
        }

        let mut body = response.text().await.unwrap_or_default();
        if body.len() > MAX_BODY_EXCERPT {
            let mut cut = MAX_BODY_EXCERPT;
            while !body.is_char_boundary(cut) {
                cut -= 1;
            }
            body.truncate(cut);
        }

        tracing::warn!(
            session_id = %report.session_id,
            status = status.as_u16(),
            body = %body,
            "report rejected by callback endpoint"
        );
        DeliveryOutcome::Rejected {
            status: status.as_u16(),
            body,
        }
    }

    fn name(&self) -> &'static str {
        "http"
    }
}
