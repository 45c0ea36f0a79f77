//! HTTP adapter - axum routes, DTOs and middleware.

pub mod honeypot;
pub mod middleware;

pub use honeypot::{honeypot_router, HoneypotAppState, RouterOptions};
