//! Data transfer objects for the honeypot endpoints.
//!
//! Request shapes are deliberately loose: the caller may send the message as
//! a bare string or as an object, and history entries in either the
//! `{role, content}` or the `{sender, text}` form.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::engagement::{HistoryTurn, Speaker};

// ═══════════════════════════════════════════════════════════════════════════
// Request DTOs
// ═══════════════════════════════════════════════════════════════════════════

/// Body of `POST /chat`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TurnRequest {
    pub session_id: Option<String>,
    pub message: Option<IncomingMessage>,
    pub conversation_history: Option<Vec<HistoryEntry>>,
    pub metadata: Option<TurnMetadata>,
}

/// The scammer's current message.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum IncomingMessage {
    Text(String),
    Structured(StructuredMessage),
}

/// Object form of a message.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StructuredMessage {
    pub text: Option<String>,
    pub sender: Option<String>,
    /// Epoch millis or an ISO string; only logged.
    pub timestamp: Option<serde_json::Value>,
}

/// One earlier turn as sent by the caller.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HistoryEntry {
    pub role: Option<String>,
    pub sender: Option<String>,
    pub content: Option<String>,
    pub text: Option<String>,
}

/// Optional channel information.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TurnMetadata {
    pub channel: Option<String>,
    pub language: Option<String>,
    pub locale: Option<String>,
}

impl IncomingMessage {
    pub fn text(&self) -> Option<&str> {
        match self {
            IncomingMessage::Text(text) => Some(text.as_str()),
            IncomingMessage::Structured(message) => message.text.as_deref(),
        }
    }
}

impl TurnRequest {
    /// Message text, if present and not blank.
    pub fn message_text(&self) -> Option<&str> {
        self.message
            .as_ref()
            .and_then(IncomingMessage::text)
            .filter(|text| !text.trim().is_empty())
    }

    /// History normalized to speaker turns; entries without text are dropped.
    pub fn history(&self) -> Vec<HistoryTurn> {
        self.conversation_history
            .iter()
            .flatten()
            .filter_map(HistoryEntry::to_turn)
            .collect()
    }
}

impl HistoryEntry {
    fn label(&self) -> Option<&str> {
        self.role.as_deref().or(self.sender.as_deref())
    }

    fn body(&self) -> Option<&str> {
        self.content.as_deref().or(self.text.as_deref())
    }

    pub fn to_turn(&self) -> Option<HistoryTurn> {
        let text = self.body().filter(|text| !text.trim().is_empty())?;
        Some(HistoryTurn::new(Speaker::from_label(self.label()), text))
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Response DTOs
// ═══════════════════════════════════════════════════════════════════════════

/// Outcome label of a turn response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnStatus {
    Success,
    Error,
}

/// Body of every `POST /chat` response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnResponse {
    pub status: TurnStatus,
    pub reply: String,
}

impl TurnResponse {
    pub fn success(reply: impl Into<String>) -> Self {
        Self {
            status: TurnStatus::Success,
            reply: reply.into(),
        }
    }

    pub fn error(reply: impl Into<String>) -> Self {
        Self {
            status: TurnStatus::Error,
            reply: reply.into(),
        }
    }
}

/// Body of `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub llm_provider: String,
}

/// Body of `GET /stats`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsResponse {
    pub active_sessions: usize,
    pub llm_provider: String,
}

/// Body of `GET /`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceInfoResponse {
    pub name: String,
    pub version: String,
    pub description: String,
    pub endpoints: BTreeMap<String, String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(value: serde_json::Value) -> TurnRequest {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn accepts_bare_string_message() {
        let request = parse(json!({"sessionId": "s1", "message": "pay now"}));
        assert_eq!(request.session_id.as_deref(), Some("s1"));
        assert_eq!(request.message_text(), Some("pay now"));
        assert!(request.history().is_empty());
    }

    #[test]
    fn accepts_structured_message() {
        let request = parse(json!({
            "sessionId": "s1",
            "message": {"sender": "scammer", "text": "Your account is blocked", "timestamp": 1_770_005_528_731u64}
        }));
        assert_eq!(request.message_text(), Some("Your account is blocked"));
    }

    #[test]
    fn blank_message_has_no_text() {
        let request = parse(json!({"sessionId": "s1", "message": "   "}));
        assert!(request.message_text().is_none());

        let request = parse(json!({"sessionId": "s1", "message": {"sender": "scammer"}}));
        assert!(request.message_text().is_none());
    }

    #[test]
    fn missing_fields_deserialize_as_none() {
        let request = parse(json!({}));
        assert!(request.session_id.is_none());
        assert!(request.message.is_none());
    }

    #[test]
    fn history_accepts_both_shapes() {
        let request = parse(json!({
            "sessionId": "s1",
            "message": "hi",
            "conversationHistory": [
                {"role": "scammer", "content": "send OTP"},
                {"sender": "user", "text": "which OTP sir?"},
                {"role": "assistant", "content": "I am confused"}
            ]
        }));

        let history = request.history();
        assert_eq!(history.len(), 3);
        assert_eq!(history[0].speaker, Speaker::Scammer);
        assert_eq!(history[0].text, "send OTP");
        assert_eq!(history[1].speaker, Speaker::Agent);
        assert_eq!(history[1].text, "which OTP sir?");
        assert_eq!(history[2].speaker, Speaker::Agent);
    }

    #[test]
    fn history_entries_without_text_are_dropped() {
        let request = parse(json!({
            "sessionId": "s1",
            "message": "hi",
            "conversationHistory": [{"role": "scammer"}, {"role": "scammer", "content": ""}]
        }));
        assert!(request.history().is_empty());
    }

    #[test]
    fn null_history_is_empty() {
        let request = parse(json!({"sessionId": "s1", "message": "hi", "conversationHistory": null}));
        assert!(request.history().is_empty());
    }

    #[test]
    fn metadata_is_optional() {
        let request = parse(json!({
            "sessionId": "s1",
            "message": "hi",
            "metadata": {"channel": "SMS", "language": "English", "locale": "IN"}
        }));
        let metadata = request.metadata.unwrap();
        assert_eq!(metadata.channel.as_deref(), Some("SMS"));
        assert_eq!(metadata.locale.as_deref(), Some("IN"));
    }

    #[test]
    fn response_status_serializes_lowercase() {
        let json = serde_json::to_value(TurnResponse::error("nope")).unwrap();
        assert_eq!(json, json!({"status": "error", "reply": "nope"}));
    }
}
