//! Failover AI Provider - Wrapper that provides automatic failover between providers.
//!
//! When the primary provider fails with a transient error (rate limit,
//! unavailable, timeout), the request is replayed against the fallback.
//!
//! # Example
//!
//! ```ignore
//! let primary = Arc::new(OpenAIProvider::new(OpenAIConfig::groq(groq_key)));
//! let fallback = Arc::new(GeminiProvider::new(GeminiConfig::new(gemini_key)));
//!
//! let provider = FailoverAIProvider::new(primary).with_fallback(fallback);
//! ```

use async_trait::async_trait;
use std::sync::Arc;

use crate::ports::{AIError, AIProvider, CompletionRequest, CompletionResponse, ProviderInfo};

/// AI provider wrapper with automatic failover support.
pub struct FailoverAIProvider {
    primary: Arc<dyn AIProvider>,
    fallback: Option<Arc<dyn AIProvider>>,
}

impl FailoverAIProvider {
    /// Creates a new failover provider with only a primary provider.
    pub fn new(primary: Arc<dyn AIProvider>) -> Self {
        Self {
            primary,
            fallback: None,
        }
    }

    /// Adds a fallback provider.
    pub fn with_fallback(mut self, fallback: Arc<dyn AIProvider>) -> Self {
        self.fallback = Some(fallback);
        self
    }

    /// Returns true if a fallback is configured.
    pub fn has_fallback(&self) -> bool {
        self.fallback.is_some()
    }
}

#[async_trait]
impl AIProvider for FailoverAIProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, AIError> {
        let err = match self.primary.complete(request.clone()).await {
            Ok(response) => return Ok(response),
            Err(err) => err,
        };

        match self.fallback {
            Some(ref fallback) if err.is_retryable() => {
                tracing::warn!(
                    primary = %self.primary.provider_info().name,
                    fallback = %fallback.provider_info().name,
                    session_id = %request.metadata.conversation_id,
                    trace_id = %request.metadata.trace_id,
                    error = %err,
                    "primary provider failed, using fallback"
                );
                fallback.complete(request).await
            }
            _ => Err(err),
        }
    }

    /// Reports the primary provider.
    fn provider_info(&self) -> ProviderInfo {
        self.primary.provider_info()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::{MockAIProvider, MockError};
    use crate::domain::foundation::ConversationId;
    use crate::ports::RequestMetadata;

    fn request() -> CompletionRequest {
        CompletionRequest::new(RequestMetadata::new(ConversationId::new("c1").unwrap()))
            .with_message(crate::ports::MessageRole::User, "hello")
    }

    #[tokio::test]
    async fn primary_success_skips_fallback() {
        let primary = MockAIProvider::new().with_response("from primary");
        let fallback = MockAIProvider::new().with_response("from fallback");
        let provider = FailoverAIProvider::new(Arc::new(primary.clone()))
            .with_fallback(Arc::new(fallback.clone()));

        let response = provider.complete(request()).await.unwrap();

        assert_eq!(response.content, "from primary");
        assert_eq!(fallback.call_count(), 0);
    }

    #[tokio::test]
    async fn retryable_error_uses_fallback() {
        let primary = MockAIProvider::new().with_error(MockError::RateLimited {
            retry_after_secs: 10,
        });
        let fallback = MockAIProvider::new().with_response("from fallback");
        let provider = FailoverAIProvider::new(Arc::new(primary.clone()))
            .with_fallback(Arc::new(fallback.clone()));

        let response = provider.complete(request()).await.unwrap();

        assert_eq!(response.content, "from fallback");
        assert_eq!(primary.call_count(), 1);
        assert_eq!(fallback.call_count(), 1);
    }

    #[tokio::test]
    async fn permanent_error_is_returned() {
        let primary = MockAIProvider::new().with_error(MockError::AuthenticationFailed);
        let fallback = MockAIProvider::new().with_response("unused");
        let provider = FailoverAIProvider::new(Arc::new(primary))
            .with_fallback(Arc::new(fallback.clone()));

        let err = provider.complete(request()).await.unwrap_err();

        assert_eq!(err, AIError::AuthenticationFailed);
        assert_eq!(fallback.call_count(), 0);
    }

    #[tokio::test]
    async fn no_fallback_returns_primary_error() {
        let primary = MockAIProvider::new().with_error(MockError::Unavailable {
            message: "down".into(),
        });
        let provider = FailoverAIProvider::new(Arc::new(primary));

        assert!(!provider.has_fallback());
        assert!(provider.complete(request()).await.is_err());
    }

    #[test]
    fn reports_primary_info() {
        let provider = FailoverAIProvider::new(Arc::new(MockAIProvider::new()))
            .with_fallback(Arc::new(
                MockAIProvider::new().with_provider_info(ProviderInfo::new("other", "m")),
            ));
        assert_eq!(provider.provider_info().name, "mock");
    }
}
