//! The scenario runner

use std::sync::Arc;
use std::time::Duration;

use action_executor::ActionHandler;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use testpilot_core_types::{ExecutionLog, Scenario};
use tokio::time::sleep;
use tracing::{info, warn};

use crate::types::{RunState, ScenarioResult};

/// Runner pacing knobs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    /// Settle delay between consecutive successful actions.
    pub inter_action_delay: Duration,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            inter_action_delay: Duration::from_millis(1500),
        }
    }
}

/// Walks a scenario's actions in order, aborting on the first failure.
pub struct ScenarioRunner {
    handler: Arc<dyn ActionHandler>,
    config: RunnerConfig,
}

impl ScenarioRunner {
    pub fn new(handler: Arc<dyn ActionHandler>, config: RunnerConfig) -> Self {
        Self { handler, config }
    }

    /// Run the scenario to a terminal state. Never fails; a broken action
    /// surfaces as an aborted result, not an error.
    pub async fn run(&self, scenario: &Scenario) -> ScenarioResult {
        let started_at = Utc::now();
        let total = scenario.actions.len();
        let mut log = ExecutionLog::new();
        let mut state = RunState::Running;
        let mut executed = 0;
        let mut error = None;

        info!(scenario = %scenario.name, actions = total, "scenario started");
        log.push(format!(
            "scenario '{}' started ({total} actions)",
            scenario.name
        ));

        for (index, action) in scenario.actions.iter().enumerate() {
            let outcome = self.handler.execute(action, &mut log).await;
            executed += 1;

            if !outcome.is_success() {
                let reason = format!(
                    "action {} of {total} failed: {}",
                    index + 1,
                    action.describe()
                );
                warn!(scenario = %scenario.name, %reason, "aborting scenario");
                log.push(format!("{reason}; skipping the remaining actions"));
                error = Some(reason);
                state = RunState::Aborted;
                break;
            }

            if index + 1 < total {
                sleep(self.config.inter_action_delay).await;
            }
        }

        if state == RunState::Running {
            state = RunState::Completed;
            info!(scenario = %scenario.name, executed, "scenario completed");
            log.push(format!("scenario '{}' completed", scenario.name));
        }

        ScenarioResult {
            scenario_name: scenario.name.clone(),
            state,
            started_at,
            finished_at: Utc::now(),
            executed,
            total,
            log,
            error,
        }
    }
}
