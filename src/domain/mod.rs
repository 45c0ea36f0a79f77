//! Domain layer containing the honeypot's business logic.
//!
//! # Module Organization
//!
//! - `foundation` - Shared primitives (identifiers, timestamps, state machine, errors)
//! - `intelligence` - Artifact extraction and the per-conversation accumulator
//! - `engagement` - Conversation agent, reporting lifecycle and persona

pub mod engagement;
pub mod foundation;
pub mod intelligence;
