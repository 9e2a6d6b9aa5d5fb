//! Report data types

use chrono::{DateTime, Utc};
use scenario_flow::ScenarioResult;
use serde::{Deserialize, Serialize};

/// What one scenario run looked like, frozen for the report file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioReport {
    pub name: String,
    /// The original natural-language instruction.
    pub description: String,
    pub success: bool,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub executed: usize,
    pub total: usize,
    /// Ordered execution log lines.
    pub log: Vec<String>,
    pub error: Option<String>,
}

impl ScenarioReport {
    pub fn from_result(result: &ScenarioResult, description: impl Into<String>) -> Self {
        Self {
            name: result.scenario_name.clone(),
            description: description.into(),
            success: result.passed(),
            started_at: result.started_at,
            finished_at: result.finished_at,
            executed: result.executed,
            total: result.total,
            log: result.log.lines(),
            error: result.error.clone(),
        }
    }
}

/// Running totals over a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub run: usize,
    pub passed: usize,
    pub failed: usize,
}

impl RunSummary {
    pub fn of(reports: &[ScenarioReport]) -> Self {
        let passed = reports.iter().filter(|r| r.success).count();
        Self {
            run: reports.len(),
            passed,
            failed: reports.len() - passed,
        }
    }
}
