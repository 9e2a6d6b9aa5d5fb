//! Shared primitives for the testpilot engine: the action/scenario data model
//! and the execution log that the engine produces for the reporter.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default bound for wait-style actions, in seconds.
pub const DEFAULT_WAIT_TIMEOUT_SECS: u64 = 30;

/// Model construction errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ModelError {
    /// The action kind requires a non-empty target.
    #[error("{0:?} requires a non-empty target")]
    MissingTarget(ActionType),

    /// The action kind requires a non-empty value.
    #[error("{0:?} requires a non-empty value")]
    MissingValue(ActionType),
}

/// The closed set of step kinds the engine can execute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    Navigate,
    Click,
    Type,
    WaitForElement,
    VerifyText,
    VerifyUrl,
}

impl ActionType {
    pub fn name(&self) -> &'static str {
        match self {
            ActionType::Navigate => "navigate",
            ActionType::Click => "click",
            ActionType::Type => "type",
            ActionType::WaitForElement => "wait_for_element",
            ActionType::VerifyText => "verify_text",
            ActionType::VerifyUrl => "verify_url",
        }
    }
}

/// One step of a scenario. Immutable once constructed; the executor consumes
/// it read-only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Action {
    pub action_type: ActionType,

    /// Element descriptor or URL. May be empty only for VerifyUrl, where the
    /// target is unused.
    pub target: String,

    /// Text to type or verify. Empty for Navigate/Click.
    pub value: String,

    /// Bound for WaitForElement, in seconds.
    pub timeout_secs: u64,
}

impl Action {
    /// Build an action, enforcing the per-kind field invariants.
    pub fn new(
        action_type: ActionType,
        target: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<Self, ModelError> {
        let target = target.into();
        let value = value.into();

        match action_type {
            ActionType::Navigate
            | ActionType::Click
            | ActionType::Type
            | ActionType::WaitForElement
                if target.trim().is_empty() =>
            {
                return Err(ModelError::MissingTarget(action_type));
            }
            _ => {}
        }
        match action_type {
            ActionType::Type | ActionType::VerifyText if value.trim().is_empty() => {
                return Err(ModelError::MissingValue(action_type));
            }
            _ => {}
        }

        Ok(Self {
            action_type,
            target,
            value,
            timeout_secs: DEFAULT_WAIT_TIMEOUT_SECS,
        })
    }

    /// Override the wait bound (WaitForElement only consults it).
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Short human description used in log lines.
    pub fn describe(&self) -> String {
        match self.action_type {
            ActionType::Navigate => format!("navigate to '{}'", self.target),
            ActionType::Click => format!("click '{}'", self.target),
            ActionType::Type => format!("type '{}' into '{}'", self.value, self.target),
            ActionType::WaitForElement => {
                format!("wait up to {}s for '{}'", self.timeout_secs, self.target)
            }
            ActionType::VerifyText => format!("verify text '{}' is visible", self.value),
            ActionType::VerifyUrl => format!("verify url contains '{}'", self.value),
        }
    }
}

/// An ordered test scenario. Action order is execution order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    pub name: String,

    /// Original prompt, kept for audit.
    pub description: String,

    /// Advisory only; the runner does not navigate to it implicitly.
    pub base_url: Option<String>,

    pub actions: Vec<Action>,
}

impl Scenario {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            base_url: None,
            actions: Vec::new(),
        }
    }

    pub fn with_base_url(mut self, base_url: Option<String>) -> Self {
        self.base_url = base_url;
        self
    }

    pub fn with_actions(mut self, actions: Vec<Action>) -> Self {
        self.actions = actions;
        self
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

/// One timestamped log line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub at: DateTime<Utc>,
    pub line: String,
}

/// Append-only execution log. The engine writes entries; the reporter reads
/// them back once the scenario is over.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExecutionLog {
    entries: Vec<LogEntry>,
}

impl ExecutionLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, line: impl Into<String>) {
        self.entries.push(LogEntry {
            at: Utc::now(),
            line: line.into(),
        });
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn lines(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.line.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
