//! Runner state and result types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use testpilot_core_types::ExecutionLog;

/// Lifecycle of one scenario run.
///
/// `NotStarted → Running → Completed | Aborted`. A result only ever carries
/// one of the two terminal states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunState {
    NotStarted,
    Running,
    /// Every action succeeded.
    Completed,
    /// An action failed; the remainder was skipped.
    Aborted,
}

/// Outcome of one scenario run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioResult {
    pub scenario_name: String,
    pub state: RunState,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    /// Actions attempted, including the failing one.
    pub executed: usize,
    /// Actions the scenario contained.
    pub total: usize,
    pub log: ExecutionLog,
    /// Present iff the run aborted.
    pub error: Option<String>,
}

impl ScenarioResult {
    pub fn passed(&self) -> bool {
        self.state == RunState::Completed
    }
}
