//! Prior conversation turns supplied by the caller.

use serde::{Deserialize, Serialize};

/// Which side of the conversation produced a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Speaker {
    /// The adversarial side; the only source of artifacts.
    Scammer,
    /// The honeypot persona's own earlier replies.
    Agent,
}

impl Speaker {
    /// Maps a caller-supplied role or sender label onto a side.
    ///
    /// `user`, `agent` and `assistant` mark the honeypot's own turns; every
    /// other label, including a missing one, is treated as the scammer.
    pub fn from_label(label: Option<&str>) -> Self {
        match label.map(|l| l.trim().to_ascii_lowercase()).as_deref() {
            Some("user") | Some("agent") | Some("assistant") => Speaker::Agent,
            _ => Speaker::Scammer,
        }
    }
}

/// One earlier turn of the conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryTurn {
    pub speaker: Speaker,
    pub text: String,
}

impl HistoryTurn {
    /// Creates a new turn.
    pub fn new(speaker: Speaker, text: impl Into<String>) -> Self {
        Self {
            speaker,
            text: text.into(),
        }
    }

    /// Creates a scammer turn.
    pub fn scammer(text: impl Into<String>) -> Self {
        Self::new(Speaker::Scammer, text)
    }

    /// Creates an agent turn.
    pub fn agent(text: impl Into<String>) -> Self {
        Self::new(Speaker::Agent, text)
    }

    /// Returns true if this turn came from the adversarial side.
    pub fn is_scammer(&self) -> bool {
        self.speaker == Speaker::Scammer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn own_labels_map_to_agent() {
        assert_eq!(Speaker::from_label(Some("user")), Speaker::Agent);
        assert_eq!(Speaker::from_label(Some("Agent")), Speaker::Agent);
        assert_eq!(Speaker::from_label(Some(" assistant ")), Speaker::Agent);
    }

    #[test]
    fn everything_else_maps_to_scammer() {
        assert_eq!(Speaker::from_label(Some("scammer")), Speaker::Scammer);
        assert_eq!(Speaker::from_label(Some("bank-officer")), Speaker::Scammer);
        assert_eq!(Speaker::from_label(None), Speaker::Scammer);
    }

    #[test]
    fn constructors_set_speaker() {
        assert!(HistoryTurn::scammer("pay now").is_scammer());
        assert!(!HistoryTurn::agent("ok sir").is_scammer());
    }
}
