//! AI provider configuration

use serde::Deserialize;
use std::fmt;
use std::time::Duration;

use super::error::ValidationError;

/// AI provider configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AiConfig {
    /// Primary AI provider
    #[serde(default = "default_provider")]
    pub provider: AiProvider,

    /// Provider used when the primary fails transiently
    pub fallback_provider: Option<AiProvider>,

    /// Groq API key
    pub groq_api_key: Option<String>,

    /// Gemini API key
    pub gemini_api_key: Option<String>,

    /// Groq model name
    #[serde(default = "default_groq_model")]
    pub groq_model: String,

    /// OpenAI-compatible base URL used for the Groq provider
    #[serde(default = "default_groq_base_url")]
    pub groq_base_url: String,

    /// Gemini model name
    #[serde(default = "default_gemini_model")]
    pub gemini_model: String,

    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Maximum tokens per reply
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Timeout for one reply in seconds, retries included
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Maximum retries on transient failures
    #[serde(default = "default_retries")]
    pub max_retries: u32,
}

/// AI provider type
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum AiProvider {
    #[default]
    Groq,
    Gemini,
}

impl fmt::Display for AiProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AiProvider::Groq => write!(f, "groq"),
            AiProvider::Gemini => write!(f, "gemini"),
        }
    }
}

impl AiConfig {
    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Check if Groq is configured
    pub fn has_groq(&self) -> bool {
        self.groq_api_key.as_ref().is_some_and(|k| !k.trim().is_empty())
    }

    /// Check if Gemini is configured
    pub fn has_gemini(&self) -> bool {
        self.gemini_api_key.as_ref().is_some_and(|k| !k.trim().is_empty())
    }

    fn has_key_for(&self, provider: AiProvider) -> bool {
        match provider {
            AiProvider::Groq => self.has_groq(),
            AiProvider::Gemini => self.has_gemini(),
        }
    }

    fn missing_key(provider: AiProvider) -> ValidationError {
        match provider {
            AiProvider::Groq => ValidationError::MissingRequired("AI__GROQ_API_KEY"),
            AiProvider::Gemini => ValidationError::MissingRequired("AI__GEMINI_API_KEY"),
        }
    }

    /// Validate AI configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.has_key_for(self.provider) {
            return Err(Self::missing_key(self.provider));
        }

        if let Some(fallback) = self.fallback_provider {
            if fallback == self.provider {
                return Err(ValidationError::InvalidFallback);
            }
            if !self.has_key_for(fallback) {
                return Err(Self::missing_key(fallback));
            }
        }

        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ValidationError::InvalidTemperature);
        }
        if self.max_tokens == 0 || self.max_tokens > 4096 {
            return Err(ValidationError::InvalidMaxTokens);
        }
        if self.timeout_secs == 0 || self.timeout_secs > 300 {
            return Err(ValidationError::InvalidTimeout);
        }

        Ok(())
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            fallback_provider: None,
            groq_api_key: None,
            gemini_api_key: None,
            groq_model: default_groq_model(),
            groq_base_url: default_groq_base_url(),
            gemini_model: default_gemini_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            timeout_secs: default_timeout(),
            max_retries: default_retries(),
        }
    }
}

fn default_provider() -> AiProvider {
    AiProvider::Groq
}

fn default_groq_model() -> String {
    "llama-3.3-70b-versatile".to_string()
}

fn default_groq_base_url() -> String {
    "https://api.groq.com/openai/v1".to_string()
}

fn default_gemini_model() -> String {
    "gemini-1.5-flash".to_string()
}

fn default_temperature() -> f32 {
    0.7
}

fn default_max_tokens() -> u32 {
    256
}

fn default_timeout() -> u64 {
    20
}

fn default_retries() -> u32 {
    1
}
