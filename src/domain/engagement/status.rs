//! EngagementStatus - lifecycle of one honeypot conversation.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::StateMachine;

/// Where a conversation stands with respect to reporting.
///
/// Valid transitions:
/// - Engaging -> Reporting (trigger fired, dispatch started)
/// - Reporting -> Engaging (delivery failed, wait for the next qualifying turn)
/// - Reporting -> Retired (delivery succeeded)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum EngagementStatus {
    #[default]
    Engaging,
    Reporting,
    Retired,
}

impl EngagementStatus {
    /// Returns true while a report may still be started.
    pub fn can_report(&self) -> bool {
        matches!(self, EngagementStatus::Engaging)
    }
}

impl StateMachine for EngagementStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        use EngagementStatus::*;
        matches!(
            (self, target),
            (Engaging, Reporting) | (Reporting, Engaging) | (Reporting, Retired)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use EngagementStatus::*;
        match self {
            Engaging => vec![Reporting],
            Reporting => vec![Engaging, Retired],
            Retired => vec![],
        }
    }
}

impl fmt::Display for EngagementStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            EngagementStatus::Engaging => "engaging",
            EngagementStatus::Reporting => "reporting",
            EngagementStatus::Retired => "retired",
        };
        write!(f, "{}", s)
    }
}
