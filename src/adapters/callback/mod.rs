//! Report Dispatcher Adapters.
//!
//! - `HttpReportDispatcher` - JSON POST to the evaluator's callback URL
//! - `LogOnlyReportDispatcher` - Logs reports when no URL is configured
//! - `MockReportDispatcher` - Configurable mock for testing

mod http_dispatcher;
mod log_dispatcher;
mod mock_dispatcher;

pub use http_dispatcher::HttpReportDispatcher;
pub use log_dispatcher::LogOnlyReportDispatcher;
pub use mock_dispatcher::MockReportDispatcher;
