//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid port number")]
    InvalidPort,

    #[error("Invalid bind address")]
    InvalidHost,

    #[error("Invalid request timeout")]
    InvalidTimeout,

    #[error("Default API key is not allowed in production")]
    DefaultApiKeyInProduction,

    #[error("API key must not be blank")]
    BlankApiKey,

    #[error("Temperature must be between 0.0 and 2.0")]
    InvalidTemperature,

    #[error("max_tokens must be between 1 and 4096")]
    InvalidMaxTokens,

    #[error("AI timeout must be shorter than the request timeout")]
    ProviderTimeoutExceedsRequest,

    #[error("Fallback provider must differ from the primary provider")]
    InvalidFallback,

    #[error("Idle timeout must be greater than zero")]
    InvalidIdleTimeout,

    #[error("Turn limit must be greater than zero")]
    InvalidTurnLimit,

    #[error("Session capacity must be greater than zero")]
    InvalidSessionCapacity,

    #[error("Callback URL must start with http:// or https://")]
    InvalidCallbackUrl,
}
