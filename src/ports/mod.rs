//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `AIProvider` - Reply generation by a language model
//! - `ReportDispatcher` - Delivery of finished intelligence reports

mod ai_provider;
mod report_dispatcher;

pub use ai_provider::{
    AIError, AIProvider, CompletionRequest, CompletionResponse, Message, MessageRole,
    ProviderInfo, RequestMetadata,
};
pub use report_dispatcher::{DeliveryOutcome, DispatchError, ReportDispatcher};
