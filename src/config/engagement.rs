//! Conversation lifecycle configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use crate::application::RegistryConfig;

/// Engagement configuration
#[derive(Debug, Clone, Deserialize)]
pub struct EngagementConfig {
    /// Seconds of inactivity before a conversation is forgotten
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u64,

    /// Turn count that triggers a report even without artifacts
    #[serde(default = "default_max_turns")]
    pub max_turns_before_report: u32,

    /// Upper bound on live conversations; unbounded when unset
    pub max_sessions: Option<usize>,
}

impl EngagementConfig {
    /// Idle timeout as Duration
    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_timeout_secs)
    }

    /// Registry settings derived from this section
    pub fn registry_config(&self) -> RegistryConfig {
        RegistryConfig {
            idle_timeout: self.idle_timeout(),
            max_turns: self.max_turns_before_report,
            max_sessions: self.max_sessions,
        }
    }

    /// Validate engagement configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.idle_timeout_secs == 0 {
            return Err(ValidationError::InvalidIdleTimeout);
        }
        if self.max_turns_before_report == 0 {
            return Err(ValidationError::InvalidTurnLimit);
        }
        if self.max_sessions == Some(0) {
            return Err(ValidationError::InvalidSessionCapacity);
        }
        Ok(())
    }
}

impl Default for EngagementConfig {
    fn default() -> Self {
        Self {
            idle_timeout_secs: default_idle_timeout(),
            max_turns_before_report: default_max_turns(),
            max_sessions: None,
        }
    }
}

fn default_idle_timeout() -> u64 {
    30 * 60
}

fn default_max_turns() -> u32 {
    10
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_map_to_registry_defaults() {
        let config = EngagementConfig::default();
        assert_eq!(config.registry_config(), RegistryConfig::default());
    }

    #[test]
    fn test_zero_values_rejected() {
        let config = EngagementConfig {
            idle_timeout_secs: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidIdleTimeout));

        let config = EngagementConfig {
            max_turns_before_report: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidTurnLimit));

        let config = EngagementConfig {
            max_sessions: Some(0),
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidSessionCapacity));
    }

    #[test]
    fn test_capacity_is_passed_through() {
        let config = EngagementConfig {
            max_sessions: Some(500),
            ..Default::default()
        };
        assert_eq!(config.registry_config().max_sessions, Some(500));
    }
}
