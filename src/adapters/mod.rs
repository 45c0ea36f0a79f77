//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the application to external systems:
//! - `ai` - Reply generation providers (Groq, Gemini, failover, mock)
//! - `callback` - Report delivery to the evaluator
//! - `http` - The axum HTTP surface

pub mod ai;
pub mod callback;
pub mod http;
