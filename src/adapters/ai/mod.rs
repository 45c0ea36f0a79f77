//! AI Provider Adapters.
//!
//! Implementations of the AIProvider port.
//!
//! ## Available Adapters
//!
//! - `OpenAIProvider` - Any OpenAI-compatible chat API (Groq by default)
//! - `GeminiProvider` - Google Gemini models
//! - `FailoverAIProvider` - Wrapper with automatic failover between providers
//! - `MockAIProvider` - Configurable mock for testing

mod failover_provider;
mod gemini_provider;
mod mock_provider;
mod openai_provider;

pub use failover_provider::FailoverAIProvider;
pub use gemini_provider::{GeminiConfig, GeminiProvider, GEMINI_BASE_URL, GEMINI_DEFAULT_MODEL};
pub use mock_provider::{MockAIProvider, MockError, MockResponse};
pub use openai_provider::{OpenAIConfig, OpenAIProvider, GROQ_BASE_URL, GROQ_DEFAULT_MODEL};
