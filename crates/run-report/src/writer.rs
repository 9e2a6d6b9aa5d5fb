//! The JSON report writer

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::ReportError;
use crate::report::{RunSummary, ScenarioReport};

/// The on-disk document shape.
#[derive(Debug, Serialize, Deserialize)]
pub struct RunDocument {
    pub generated_at: DateTime<Utc>,
    pub summary: RunSummary,
    pub scenarios: Vec<ScenarioReport>,
}

/// Collects scenario reports and flushes them as one pretty-printed JSON
/// document.
pub struct JsonReporter {
    path: PathBuf,
    reports: Vec<ScenarioReport>,
}

impl JsonReporter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            reports: Vec::new(),
        }
    }

    pub fn record(&mut self, report: ScenarioReport) {
        self.reports.push(report);
    }

    pub fn summary(&self) -> RunSummary {
        RunSummary::of(&self.reports)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the collected reports to disk, replacing any previous file.
    pub fn flush(&self) -> Result<(), ReportError> {
        let document = RunDocument {
            generated_at: Utc::now(),
            summary: self.summary(),
            scenarios: self.reports.clone(),
        };
        let body = serde_json::to_string_pretty(&document)?;
        fs::write(&self.path, body)?;
        info!(path = %self.path.display(), scenarios = self.reports.len(), "report written");
        Ok(())
    }
}
