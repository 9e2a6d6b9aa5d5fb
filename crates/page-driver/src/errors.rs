//! Error types for the driver boundary

use thiserror::Error;

/// Driver error enumeration.
#[derive(Debug, Error, Clone)]
pub enum DriverError {
    /// Browser could not be launched or attached.
    #[error("browser launch failed: {0}")]
    Launch(String),

    /// Navigation failed before the page settled.
    #[error("navigation failed: {0}")]
    Navigation(String),

    /// An operation exceeded its deadline.
    #[error("timed out waiting for {0}")]
    Timeout(String),

    /// Injected script failed or returned something unusable.
    #[error("script evaluation failed: {0}")]
    Script(String),

    /// Click/fill against a resolved element failed.
    #[error("interaction failed: {0}")]
    Interaction(String),

    /// Runtime plumbing failure (task join, channel loss).
    #[error("internal driver error: {0}")]
    Internal(String),
}

impl DriverError {
    /// Timeouts and interaction failures are worth retrying; the rest are not.
    pub fn is_transient(&self) -> bool {
        matches!(self, DriverError::Timeout(_) | DriverError::Interaction(_))
    }
}
