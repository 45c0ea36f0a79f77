//! SessionRegistry - process-wide map of live conversations.
//!
//! One registry is built at startup and shared by every request handler.
//! The entry map sits behind a single mutex so that "sweep expired, then
//! look up or create" is one atomic step; two concurrent first turns for the
//! same identifier always end up with the same agent.
//!
//! Agents are handed out as [`SharedAgent`] handles. The registry never
//! locks an agent itself, so a slow turn on one conversation cannot hold up
//! the map.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;

use crate::domain::engagement::{ConversationAgent, DEFAULT_MAX_TURNS};
use crate::domain::foundation::{ConversationId, Timestamp};

/// Handle to one conversation's agent; lock it for every mutation.
pub type SharedAgent = Arc<Mutex<ConversationAgent>>;

/// Default idle timeout before a conversation is forgotten.
pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(30 * 60);

/// Tuning for a [`SessionRegistry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistryConfig {
    /// Entries idle for longer than this are swept.
    pub idle_timeout: Duration,
    /// Turn limit handed to every new agent.
    pub max_turns: u32,
    /// Upper bound on live entries; `None` means unbounded.
    pub max_sessions: Option<usize>,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            idle_timeout: DEFAULT_IDLE_TIMEOUT,
            max_turns: DEFAULT_MAX_TURNS,
            max_sessions: None,
        }
    }
}

/// Errors from [`SessionRegistry::resolve_or_create`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("session capacity of {capacity} reached")]
    CapacityReached { capacity: usize },
}

#[derive(Debug)]
struct RegistryEntry {
    agent: SharedAgent,
    created_at: Timestamp,
    last_activity: Timestamp,
}

/// Concurrent map from conversation identifier to agent.
#[derive(Debug)]
pub struct SessionRegistry {
    config: RegistryConfig,
    entries: Mutex<HashMap<ConversationId, RegistryEntry>>,
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new(RegistryConfig::default())
    }
}

impl SessionRegistry {
    pub fn new(config: RegistryConfig) -> Self {
        Self {
            config,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Returns the agent for `id`, creating it on first use.
    ///
    /// Expired entries are swept first and the entry's activity timestamp
    /// is refreshed either way.
    ///
    /// # Errors
    ///
    /// - `CapacityReached` if `id` is new and the registry is full
    pub async fn resolve_or_create(&self, id: &ConversationId) -> Result<SharedAgent, RegistryError> {
        let now = Timestamp::now();
        let mut entries = self.entries.lock().await;
        self.sweep_locked(&mut entries, now);

        if let Some(entry) = entries.get_mut(id) {
            entry.last_activity = now;
            return Ok(entry.agent.clone());
        }

        if let Some(capacity) = self.config.max_sessions {
            if entries.len() >= capacity {
                tracing::warn!(session_id = %id, capacity, "session capacity reached");
                return Err(RegistryError::CapacityReached { capacity });
            }
        }

        let agent = Arc::new(Mutex::new(ConversationAgent::new(
            id.clone(),
            self.config.max_turns,
        )));
        entries.insert(
            id.clone(),
            RegistryEntry {
                agent: agent.clone(),
                created_at: now,
                last_activity: now,
            },
        );
        tracing::debug!(session_id = %id, active = entries.len(), "session created");

        Ok(agent)
    }

    /// Removes the entry for `id` if present. Returns true if one was removed.
    pub async fn retire(&self, id: &ConversationId) -> bool {
        let removed = self.entries.lock().await.remove(id).is_some();
        if removed {
            tracing::debug!(session_id = %id, "session retired");
        }
        removed
    }

    /// Removes the entry for `id` only if it still holds `agent`.
    ///
    /// A conversation that expired and was recreated while its report was
    /// in flight keeps its fresh entry.
    pub async fn retire_agent(&self, id: &ConversationId, agent: &SharedAgent) -> bool {
        let mut entries = self.entries.lock().await;
        let is_current = entries
            .get(id)
            .map(|entry| Arc::ptr_eq(&entry.agent, agent))
            .unwrap_or(false);

        if is_current {
            entries.remove(id);
            tracing::debug!(session_id = %id, "session retired");
        }
        is_current
    }

    /// Number of live conversations, after sweeping expired ones.
    pub async fn active_count(&self) -> usize {
        let mut entries = self.entries.lock().await;
        self.sweep_locked(&mut entries, Timestamp::now());
        entries.len()
    }

    /// Sweeps expired entries now. Returns how many were removed.
    pub async fn sweep(&self) -> usize {
        let mut entries = self.entries.lock().await;
        self.sweep_locked(&mut entries, Timestamp::now())
    }

    /// When the entry for `id` was created, if it is live.
    pub async fn created_at(&self, id: &ConversationId) -> Option<Timestamp> {
        self.entries.lock().await.get(id).map(|entry| entry.created_at)
    }

    fn sweep_locked(&self, entries: &mut HashMap<ConversationId, RegistryEntry>, now: Timestamp) -> usize {
        let before = entries.len();
        entries.retain(|_, entry| now.elapsed_since(&entry.last_activity) <= self.config.idle_timeout);
        let removed = before - entries.len();

        if removed > 0 {
            tracing::debug!(removed, remaining = entries.len(), "swept idle sessions");
        }
        removed
    }
}
