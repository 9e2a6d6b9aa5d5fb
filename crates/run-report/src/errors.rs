//! Reporter error types

use thiserror::Error;

/// Report writing error enumeration.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("could not write the report file: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not encode the report: {0}")]
    Encode(#[from] serde_json::Error),
}
