//! Run reporting.
//!
//! Each finished scenario becomes a [`ScenarioReport`]; [`JsonReporter`]
//! collects them, keeps the [`RunSummary`] totals, and flushes one
//! pretty-printed JSON document to disk at the end of the session.

pub mod errors;
pub mod report;
pub mod writer;

pub use errors::ReportError;
pub use report::{RunSummary, ScenarioReport};
pub use writer::JsonReporter;
