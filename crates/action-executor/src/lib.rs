//! Action execution.
//!
//! [`ActionExecutor`] turns one abstract [`Action`] into browser work:
//! resolve the target, retry transient failures per [`RetryPolicy`], wait for
//! the page to settle, and judge Success or Failure. Driver errors never
//! escape an action; they are logged and folded into the outcome.
//!
//! [`Action`]: testpilot_core_types::Action

pub mod config;
pub mod executor;
pub mod handler;
pub mod retry;

pub use config::ExecutorConfig;
pub use executor::ActionExecutor;
pub use handler::{ActionHandler, ActionOutcome};
pub use retry::RetryPolicy;
