//! Scam Honeypot - conversational decoy for scam operators
//!
//! This crate answers scammer messages in the voice of a believable victim,
//! extracts payment and contact details from what the scammer writes, and
//! reports the collected intelligence to an external evaluator once a
//! conversation has yielded enough.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
