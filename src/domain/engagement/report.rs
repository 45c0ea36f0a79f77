//! Report - the final intelligence payload for one conversation.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::ConversationId;
use crate::domain::intelligence::ArtifactSet;

/// Notes text used when nothing noteworthy happened.
pub const DEFAULT_AGENT_NOTES: &str = "Engaged with potential scammer";

/// Immutable snapshot handed to a report dispatcher.
///
/// Field names match the evaluator's wire format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub session_id: ConversationId,
    pub scam_detected: bool,
    pub total_messages_exchanged: u32,
    pub extracted_intelligence: ArtifactSet,
    pub agent_notes: String,
}

impl Report {
    /// Projects conversation state into a report.
    ///
    /// `turns` counts inbound turns; the exchanged total covers both sides.
    pub fn new(
        session_id: ConversationId,
        artifacts: &ArtifactSet,
        turns: u32,
        notes: &[String],
    ) -> Self {
        let agent_notes = if notes.is_empty() {
            DEFAULT_AGENT_NOTES.to_string()
        } else {
            notes.join(". ")
        };

        Self {
            session_id,
            scam_detected: !artifacts.is_empty(),
            total_messages_exchanged: turns.saturating_mul(2),
            extracted_intelligence: artifacts.clone(),
            agent_notes,
        }
    }
}
