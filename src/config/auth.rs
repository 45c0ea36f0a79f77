//! API key authentication configuration

use secrecy::Secret;
use serde::Deserialize;

use super::error::ValidationError;
use super::server::Environment;

/// Shared secret accepted outside production when none is configured.
pub const DEFAULT_API_KEY: &str = "127128";

/// Header carrying the shared secret.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Authentication configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthConfig {
    /// Shared secret expected in the `x-api-key` header
    pub api_key: Option<String>,
}

impl AuthConfig {
    /// The key requests must present.
    pub fn resolved_api_key(&self) -> Secret<String> {
        Secret::new(
            self.api_key
                .clone()
                .unwrap_or_else(|| DEFAULT_API_KEY.to_string()),
        )
    }

    /// Validate authentication configuration
    ///
    /// Production requires an explicit key other than the default.
    pub fn validate(&self, environment: &Environment) -> Result<(), ValidationError> {
        if let Some(ref key) = self.api_key {
            if key.trim().is_empty() {
                return Err(ValidationError::BlankApiKey);
            }
        }

        if *environment == Environment::Production {
            match self.api_key.as_deref() {
                None => return Err(ValidationError::MissingRequired("AUTH__API_KEY")),
                Some(DEFAULT_API_KEY) => return Err(ValidationError::DefaultApiKeyInProduction),
                Some(_) => {}
            }
        }

        Ok(())
    }
}
