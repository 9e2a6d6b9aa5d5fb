//! Scenario execution.
//!
//! [`ScenarioRunner`] walks a scenario's actions in order through an
//! [`ActionHandler`], aborting on the first failure. `run` never fails; it
//! always returns a [`ScenarioResult`] carrying the terminal state, the
//! execution log and an optional error description.
//!
//! [`ActionHandler`]: action_executor::ActionHandler

pub mod runner;
pub mod types;

pub use runner::{RunnerConfig, ScenarioRunner};
pub use types::{RunState, ScenarioResult};
