//! HTTP middleware for axum.
//!
//! - `api_key` - Shared-secret header check

pub mod api_key;

pub use api_key::{api_key_middleware, ApiKeyState, EXEMPT_PATHS};
