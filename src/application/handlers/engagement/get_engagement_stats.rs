//! GetEngagementStatsHandler - Query handler for service statistics.

use std::sync::Arc;

use crate::application::registry::SessionRegistry;
use crate::ports::{AIProvider, ProviderInfo};

/// Snapshot of live engagement state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngagementStats {
    pub active_sessions: usize,
    pub provider: ProviderInfo,
}

/// Handler for the stats query.
pub struct GetEngagementStatsHandler {
    registry: Arc<SessionRegistry>,
    provider: Arc<dyn AIProvider>,
}

impl GetEngagementStatsHandler {
    pub fn new(registry: Arc<SessionRegistry>, provider: Arc<dyn AIProvider>) -> Self {
        Self { registry, provider }
    }

    /// Provider description without touching the registry.
    pub fn provider_info(&self) -> ProviderInfo {
        self.provider.provider_info()
    }

    pub async fn handle(&self) -> EngagementStats {
        EngagementStats {
            active_sessions: self.registry.active_count().await,
            provider: self.provider.provider_info(),
        }
    }
}
