//! Honeypot HTTP adapter - the turn endpoint plus info, health and stats.

pub mod dto;
pub mod handlers;
pub mod routes;

pub use dto::*;
pub use handlers::{HoneypotAppState, SERVICE_NAME};
pub use routes::{honeypot_router, honeypot_routes, RouterOptions};
