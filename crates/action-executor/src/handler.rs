//! The action-handling seam between the executor and the scenario runner

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use testpilot_core_types::{Action, ExecutionLog};

/// Terminal judgement for one action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionOutcome {
    Success,
    Failure,
}

impl ActionOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, ActionOutcome::Success)
    }

    pub fn from_bool(ok: bool) -> Self {
        if ok {
            ActionOutcome::Success
        } else {
            ActionOutcome::Failure
        }
    }
}

/// Executes one action against the page. Implementations never fail; every
/// internal error is logged and folded into [`ActionOutcome::Failure`].
#[async_trait]
pub trait ActionHandler: Send + Sync {
    async fn execute(&self, action: &Action, log: &mut ExecutionLog) -> ActionOutcome;
}
