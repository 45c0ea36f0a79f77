//! HTTP handlers for the honeypot endpoints.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use axum::{body::Bytes, extract::State, Json};

use super::dto::{HealthResponse, ServiceInfoResponse, StatsResponse, TurnRequest, TurnResponse};
use crate::application::{GetEngagementStatsHandler, ProcessTurnCommand, ProcessTurnHandler};
use crate::domain::engagement::persona::FILLER_REPLY;
use crate::domain::foundation::ConversationId;

/// Service name reported by `/health` and `/`.
pub const SERVICE_NAME: &str = "Honeypot AI";

pub const MISSING_SESSION_REPLY: &str = "sessionId is required";
pub const EMPTY_MESSAGE_REPLY: &str = "message text is required";
pub const MALFORMED_BODY_REPLY: &str = "request body must be a JSON object with sessionId and message";

/// Longest a `/chat` request waits for its turn before answering with filler.
pub const DEFAULT_TURN_TIMEOUT: Duration = Duration::from_secs(25);

/// Application state for honeypot endpoints.
#[derive(Clone)]
pub struct HoneypotAppState {
    pub process_turn: Arc<ProcessTurnHandler>,
    pub stats: Arc<GetEngagementStatsHandler>,
    /// Time budget for one turn, including the wait for the session lock.
    pub turn_timeout: Duration,
}

impl HoneypotAppState {
    pub fn new(process_turn: Arc<ProcessTurnHandler>, stats: Arc<GetEngagementStatsHandler>) -> Self {
        Self {
            process_turn,
            stats,
            turn_timeout: DEFAULT_TURN_TIMEOUT,
        }
    }

    pub fn with_turn_timeout(mut self, turn_timeout: Duration) -> Self {
        self.turn_timeout = turn_timeout;
        self
    }

    /// Caps the turn budget at 90% of `request_timeout` so the JSON reply
    /// always beats the outer request deadline.
    pub fn bounded_by(mut self, request_timeout: Duration) -> Self {
        self.turn_timeout = self.turn_timeout.min(request_timeout * 9 / 10);
        self
    }
}

/// Process one scammer message.
///
/// POST /chat
///
/// Always answers 200 with a `{status, reply}` body. Input problems yield
/// `status: "error"`; a fault inside the turn or a turn that outlives
/// `turn_timeout` yields a filler reply.
pub async fn chat(State(state): State<HoneypotAppState>, body: Bytes) -> Json<TurnResponse> {
    let request: TurnRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(err) => {
            tracing::warn!(error = %err, "unparseable chat request");
            return Json(TurnResponse::error(MALFORMED_BODY_REPLY));
        }
    };

    let command = match turn_command(&request) {
        Ok(command) => command,
        Err(reply) => return Json(TurnResponse::error(reply)),
    };

    if let Some(metadata) = &request.metadata {
        tracing::debug!(
            session_id = %command.conversation_id,
            channel = metadata.channel.as_deref().unwrap_or("-"),
            language = metadata.language.as_deref().unwrap_or("-"),
            locale = metadata.locale.as_deref().unwrap_or("-"),
            "turn received"
        );
    }

    let session_id = command.conversation_id.clone();
    let handler = state.process_turn.clone();

    // A panic inside the turn surfaces as a JoinError instead of tearing
    // down the connection. An overdue turn keeps running detached so its
    // intelligence still lands in the session.
    let turn = tokio::spawn(async move { handler.handle(command).await });
    match tokio::time::timeout(state.turn_timeout, turn).await {
        Err(_) => {
            tracing::warn!(
                session_id = %session_id,
                timeout_ms = state.turn_timeout.as_millis() as u64,
                "turn exceeded its budget"
            );
            Json(TurnResponse::success(FILLER_REPLY))
        }
        Ok(Ok(result)) => {
            tracing::debug!(
                session_id = %session_id,
                turn = result.turn,
                source = ?result.source,
                reporting = result.dispatch.is_some(),
                "turn processed"
            );
            Json(TurnResponse::success(result.reply))
        }
        Ok(Err(err)) => {
            tracing::error!(session_id = %session_id, error = %err, "turn processing aborted");
            Json(TurnResponse::success(FILLER_REPLY))
        }
    }
}

fn turn_command(request: &TurnRequest) -> Result<ProcessTurnCommand, &'static str> {
    let conversation_id = request
        .session_id
        .as_deref()
        .and_then(|id| ConversationId::new(id).ok())
        .ok_or(MISSING_SESSION_REPLY)?;

    let message = request.message_text().ok_or(EMPTY_MESSAGE_REPLY)?;

    Ok(ProcessTurnCommand {
        conversation_id,
        message: message.to_string(),
        history: request.history(),
    })
}

/// Liveness check.
///
/// GET /health
pub async fn health(State(state): State<HoneypotAppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        service: SERVICE_NAME.to_string(),
        llm_provider: state.stats.provider_info().name,
    })
}

/// Count of live conversations.
///
/// GET /stats
pub async fn stats(State(state): State<HoneypotAppState>) -> Json<StatsResponse> {
    let stats = state.stats.handle().await;
    Json(StatsResponse {
        active_sessions: stats.active_sessions,
        llm_provider: stats.provider.name,
    })
}

/// Service description.
///
/// GET /
pub async fn service_info() -> Json<ServiceInfoResponse> {
    let endpoints = [
        ("POST /chat", "Send scammer message, get victim response"),
        ("GET /health", "Health check"),
        ("GET /stats", "View statistics"),
    ]
    .into_iter()
    .map(|(route, about)| (route.to_string(), about.to_string()))
    .collect::<BTreeMap<_, _>>();

    Json(ServiceInfoResponse {
        name: format!("{SERVICE_NAME} API"),
        version: env!("CARGO_PKG_VERSION").to_string(),
        description: "Scam engagement and intelligence extraction system".to_string(),
        endpoints,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::MockAIProvider;
    use crate::adapters::callback::MockReportDispatcher;
    use crate::application::{DispatchReportHandler, SessionRegistry, TurnSettings};
    use serde_json::json;

    fn state() -> HoneypotAppState {
        let registry = Arc::new(SessionRegistry::default());
        let provider = Arc::new(MockAIProvider::new());
        let dispatch = Arc::new(DispatchReportHandler::new(
            Arc::new(MockReportDispatcher::new()),
            registry.clone(),
        ));
        HoneypotAppState::new(
            Arc::new(ProcessTurnHandler::new(
                registry.clone(),
                provider.clone(),
                dispatch,
                TurnSettings::default(),
            )),
            Arc::new(GetEngagementStatsHandler::new(registry, provider)),
        )
    }

    fn request(value: serde_json::Value) -> TurnRequest {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn command_requires_session_id() {
        let err = turn_command(&request(json!({"message": "hi"}))).unwrap_err();
        assert_eq!(err, MISSING_SESSION_REPLY);

        let err = turn_command(&request(json!({"sessionId": "  ", "message": "hi"}))).unwrap_err();
        assert_eq!(err, MISSING_SESSION_REPLY);
    }

    #[test]
    fn command_requires_message_text() {
        let err = turn_command(&request(json!({"sessionId": "s1", "message": ""}))).unwrap_err();
        assert_eq!(err, EMPTY_MESSAGE_REPLY);

        let err = turn_command(&request(json!({"sessionId": "s1"}))).unwrap_err();
        assert_eq!(err, EMPTY_MESSAGE_REPLY);
    }

    #[test]
    fn command_carries_message_and_history() {
        let command = turn_command(&request(json!({
            "sessionId": "s1",
            "message": {"text": "pay to fraud@ybl"},
            "conversationHistory": [{"sender": "scammer", "text": "hello"}]
        })))
        .unwrap();

        assert_eq!(command.conversation_id.as_str(), "s1");
        assert_eq!(command.message, "pay to fraud@ybl");
        assert_eq!(command.history.len(), 1);
        assert!(command.history[0].is_scammer());
    }

    #[test]
    fn turn_budget_stays_below_request_timeout() {
        let state = state().bounded_by(Duration::from_secs(10));
        assert_eq!(state.turn_timeout, Duration::from_secs(9));

        let state = state
            .with_turn_timeout(Duration::from_secs(3))
            .bounded_by(Duration::from_secs(30));
        assert_eq!(state.turn_timeout, Duration::from_secs(3));
    }
}
