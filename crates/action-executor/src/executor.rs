//! The action executor

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use element_locator::ElementResolver;
use page_driver::{PageDriver, Role, WaitMode};
use testpilot_core_types::{Action, ActionType, ExecutionLog};
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::config::ExecutorConfig;
use crate::handler::{ActionHandler, ActionOutcome};

/// Executes single actions against a page through the driver boundary.
pub struct ActionExecutor {
    driver: Arc<dyn PageDriver>,
    resolver: ElementResolver,
    config: ExecutorConfig,
}

impl ActionExecutor {
    pub fn new(driver: Arc<dyn PageDriver>, config: ExecutorConfig) -> Self {
        let resolver = ElementResolver::new(driver.clone());
        Self {
            driver,
            resolver,
            config,
        }
    }

    async fn run_navigate(&self, action: &Action, log: &mut ExecutionLog) -> ActionOutcome {
        let raw = action.target.trim();
        if !looks_like_url(raw) {
            log.push(format!(
                "'{raw}' does not look like a URL; use a click action for in-page targets"
            ));
            return ActionOutcome::Failure;
        }

        let url = ensure_scheme(raw);
        let policy = self.config.navigation_retry;
        for attempt in policy.attempt_numbers() {
            match self
                .driver
                .navigate(&url, WaitMode::NetworkIdle, self.config.navigation_timeout)
                .await
            {
                Ok(()) => {
                    sleep(self.config.settle_delay).await;
                    log.push(format!("navigated to {url}"));
                    return ActionOutcome::Success;
                }
                Err(err) => {
                    warn!(url = %url, attempt, error = %err, "navigation attempt failed");
                    log.push(format!(
                        "navigation attempt {attempt}/{} failed: {err}",
                        policy.attempts
                    ));
                    if policy.has_next(attempt) {
                        sleep(policy.pause).await;
                    }
                }
            }
        }

        log.push(format!("giving up on navigation to {url}"));
        ActionOutcome::Failure
    }

    async fn run_click(&self, action: &Action, log: &mut ExecutionLog) -> ActionOutcome {
        let Some(candidate) = self.resolver.resolve_click(&action.target).await else {
            log.push(format!("could not find '{}' to click", action.target));
            self.log_click_diagnostics(log).await;
            return ActionOutcome::Failure;
        };

        log.push(format!(
            "resolved '{}' via {} ({} match{})",
            action.target,
            candidate.strategy,
            candidate.match_count,
            if candidate.match_count == 1 { "" } else { "es" }
        ));

        let policy = self.config.click_retry;
        for attempt in policy.attempt_numbers() {
            match self
                .driver
                .click(&candidate.handle, self.config.click_timeout)
                .await
            {
                Ok(()) => {
                    sleep(self.config.settle_delay).await;
                    if self.config.mentions_nav_keyword(&action.target) {
                        sleep(self.config.nav_keyword_settle).await;
                        if let Err(err) = self
                            .driver
                            .wait_network_idle(self.config.post_click_idle_timeout)
                            .await
                        {
                            debug!(error = %err, "post-click idle wait gave up, continuing");
                        }
                    }
                    log.push(format!("clicked '{}'", action.target));
                    return ActionOutcome::Success;
                }
                Err(err) => {
                    warn!(target = %action.target, attempt, error = %err, "click attempt failed");
                    log.push(format!(
                        "click attempt {attempt}/{} failed: {err}",
                        policy.attempts
                    ));
                    if policy.has_next(attempt) {
                        sleep(policy.pause).await;
                    }
                }
            }
        }

        log.push(format!("giving up on clicking '{}'", action.target));
        ActionOutcome::Failure
    }

    async fn log_click_diagnostics(&self, log: &mut ExecutionLog) {
        for role in [Role::Button, Role::Link] {
            match self
                .driver
                .visible_summaries(role, self.config.diagnostics_cap)
                .await
            {
                Ok(items) if !items.is_empty() => {
                    log.push(format!("visible {}s: {}", role.name(), items.join(" | ")));
                }
                Ok(_) => {}
                Err(err) => debug!(role = role.name(), error = %err, "diagnostics lookup failed"),
            }
        }
    }

    async fn run_type(&self, action: &Action, log: &mut ExecutionLog) -> ActionOutcome {
        let Some(candidate) = self.resolver.resolve_input(&action.target).await else {
            log.push(format!("could not find input '{}'", action.target));
            return ActionOutcome::Failure;
        };

        log.push(format!(
            "resolved input '{}' via {}",
            action.target, candidate.strategy
        ));

        // A failed fill means the field itself is broken; retrying will not
        // help the way it does for clicks.
        match self.driver.fill(&candidate.handle, &action.value).await {
            Ok(()) => {
                log.push(format!("typed '{}' into '{}'", action.value, action.target));
                ActionOutcome::Success
            }
            Err(err) => {
                warn!(target = %action.target, error = %err, "fill failed");
                log.push(format!("typing into '{}' failed: {err}", action.target));
                ActionOutcome::Failure
            }
        }
    }

    async fn run_wait(&self, action: &Action, log: &mut ExecutionLog) -> ActionOutcome {
        let needle = action.target.trim();
        let bound = Duration::from_millis(action.timeout_secs.saturating_mul(1000));
        match self.driver.wait_for_text(needle, bound).await {
            Ok(()) => {
                log.push(format!("'{}' appeared", action.target));
                ActionOutcome::Success
            }
            Err(err) => {
                log.push(format!(
                    "'{}' did not appear within {}s: {err}",
                    action.target, action.timeout_secs
                ));
                ActionOutcome::Failure
            }
        }
    }

    async fn run_verify_text(&self, action: &Action, log: &mut ExecutionLog) -> ActionOutcome {
        let needle = action.value.trim();
        if needle.is_empty() {
            log.push("verify-text was given an empty value; nothing to check".to_string());
            return ActionOutcome::Failure;
        }

        if self.resolver.resolve_visible_text(needle).await {
            log.push(format!("text '{needle}' is visible"));
            ActionOutcome::Success
        } else {
            log.push(format!("text '{needle}' is not visible on the page"));
            ActionOutcome::Failure
        }
    }

    async fn run_verify_url(&self, action: &Action, log: &mut ExecutionLog) -> ActionOutcome {
        match self.driver.current_url().await {
            Ok(url) if url.contains(&action.value) => {
                log.push(format!("url '{url}' contains '{}'", action.value));
                ActionOutcome::Success
            }
            Ok(url) => {
                log.push(format!("url '{url}' does not contain '{}'", action.value));
                ActionOutcome::Failure
            }
            Err(err) => {
                log.push(format!("could not read the current url: {err}"));
                ActionOutcome::Failure
            }
        }
    }
}

#[async_trait]
impl ActionHandler for ActionExecutor {
    async fn execute(&self, action: &Action, log: &mut ExecutionLog) -> ActionOutcome {
        info!(action = %action.describe(), "executing action");
        log.push(action.describe());

        let outcome = match action.action_type {
            ActionType::Navigate => self.run_navigate(action, log).await,
            ActionType::Click => self.run_click(action, log).await,
            ActionType::Type => self.run_type(action, log).await,
            ActionType::WaitForElement => self.run_wait(action, log).await,
            ActionType::VerifyText => self.run_verify_text(action, log).await,
            ActionType::VerifyUrl => self.run_verify_url(action, log).await,
        };

        match outcome {
            ActionOutcome::Success => debug!(action = action.action_type.name(), "action passed"),
            ActionOutcome::Failure => warn!(action = action.action_type.name(), "action failed"),
        }
        outcome
    }
}

/// A navigation target must at least resemble a URL: an explicit scheme, a
/// dot, or a path separator.
fn looks_like_url(target: &str) -> bool {
    target.starts_with("http://")
        || target.starts_with("https://")
        || target.contains('.')
        || target.contains('/')
}

fn ensure_scheme(target: &str) -> String {
    if target.starts_with("http://") || target.starts_with("https://") {
        target.to_string()
    } else {
        format!("https://{target}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use page_driver::{DriverError, ElementHandle, ElementInfo, InputKind, TextMatch};

    fn el(id: &str, tag: &str, visible: bool, text: &str) -> ElementInfo {
        ElementInfo {
            handle: ElementHandle(id.to_string()),
            tag: tag.to_string(),
            role: None,
            visible,
            text: text.to_string(),
        }
    }

    /// Scripted driver with call counters. Failure counts burn down: a
    /// `click_failures` of 2 makes the first two clicks fail and the rest
    /// succeed.
    #[derive(Default)]
    struct ScriptedDriver {
        navigated: Mutex<Vec<String>>,
        navigate_failures: AtomicUsize,
        click_calls: AtomicUsize,
        click_failures: AtomicUsize,
        fill_calls: AtomicUsize,
        fill_fails: bool,
        text_calls: AtomicUsize,
        by_role: HashMap<String, Vec<ElementInfo>>,
        by_text: HashMap<String, Vec<ElementInfo>>,
        by_label: HashMap<String, Vec<ElementInfo>>,
        url: String,
        idle_calls: AtomicUsize,
        button_summaries: Vec<String>,
        link_summaries: Vec<String>,
    }

    fn burn(counter: &AtomicUsize) -> bool {
        counter
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }

    #[async_trait]
    impl PageDriver for ScriptedDriver {
        async fn navigate(
            &self,
            url: &str,
            _mode: WaitMode,
            _timeout: Duration,
        ) -> Result<(), DriverError> {
            self.navigated.lock().unwrap().push(url.to_string());
            if burn(&self.navigate_failures) {
                return Err(DriverError::Timeout("navigation".into()));
            }
            Ok(())
        }

        async fn wait_network_idle(&self, _timeout: Duration) -> Result<(), DriverError> {
            self.idle_calls.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        async fn find_by_role(
            &self,
            role: Role,
            name: &str,
            _mode: TextMatch,
        ) -> Result<Vec<ElementInfo>, DriverError> {
            let key = format!("{}:{name}", role.name());
            Ok(self.by_role.get(&key).cloned().unwrap_or_default())
        }

        async fn find_by_text(&self, text: &str) -> Result<Vec<ElementInfo>, DriverError> {
            self.text_calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.by_text.get(text).cloned().unwrap_or_default())
        }

        async fn find_by_label(&self, label: &str) -> Result<Vec<ElementInfo>, DriverError> {
            Ok(self.by_label.get(label).cloned().unwrap_or_default())
        }

        async fn find_by_placeholder(
            &self,
            _placeholder: &str,
        ) -> Result<Vec<ElementInfo>, DriverError> {
            Ok(Vec::new())
        }

        async fn find_input_of_kind(
            &self,
            _kind: InputKind,
        ) -> Result<Vec<ElementInfo>, DriverError> {
            Ok(Vec::new())
        }

        async fn find_input_by_attr(
            &self,
            _needle: &str,
        ) -> Result<Vec<ElementInfo>, DriverError> {
            Ok(Vec::new())
        }

        async fn click(
            &self,
            _handle: &ElementHandle,
            _timeout: Duration,
        ) -> Result<(), DriverError> {
            self.click_calls.fetch_add(1, Ordering::SeqCst);
            if burn(&self.click_failures) {
                return Err(DriverError::Interaction("node detached".into()));
            }
            Ok(())
        }

        async fn fill(&self, _handle: &ElementHandle, _text: &str) -> Result<(), DriverError> {
            self.fill_calls.fetch_add(1, Ordering::SeqCst);
            if self.fill_fails {
                return Err(DriverError::Interaction("fill rejected".into()));
            }
            Ok(())
        }

        async fn wait_for_text(
            &self,
            text: &str,
            _timeout: Duration,
        ) -> Result<(), DriverError> {
            if self.by_text.contains_key(text) {
                Ok(())
            } else {
                Err(DriverError::Timeout(format!("text '{text}'")))
            }
        }

        async fn current_url(&self) -> Result<String, DriverError> {
            Ok(self.url.clone())
        }

        async fn is_visible(&self, _handle: &ElementHandle) -> Result<bool, DriverError> {
            Ok(true)
        }

        async fn visible_summaries(
            &self,
            role: Role,
            cap: usize,
        ) -> Result<Vec<String>, DriverError> {
            let items = match role {
                Role::Button => &self.button_summaries,
                Role::Link => &self.link_summaries,
            };
            Ok(items.iter().take(cap).cloned().collect())
        }
    }

    fn executor(driver: ScriptedDriver) -> (ActionExecutor, Arc<ScriptedDriver>) {
        let driver = Arc::new(driver);
        let executor = ActionExecutor::new(driver.clone(), ExecutorConfig::default());
        (executor, driver)
    }

    fn action(action_type: ActionType, target: &str, value: &str) -> Action {
        Action::new(action_type, target, value).unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn navigate_rejects_non_url_targets_without_touching_the_page() {
        let (executor, driver) = executor(ScriptedDriver::default());
        let mut log = ExecutionLog::new();

        let outcome = executor
            .execute(&action(ActionType::Navigate, "Products", ""), &mut log)
            .await;

        assert_eq!(outcome, ActionOutcome::Failure);
        assert!(driver.navigated.lock().unwrap().is_empty());
        assert!(log
            .lines()
            .iter()
            .any(|l| l.contains("use a click action")));
    }

    #[tokio::test(start_paused = true)]
    async fn navigate_prefixes_https_when_scheme_is_missing() {
        let (executor, driver) = executor(ScriptedDriver::default());
        let mut log = ExecutionLog::new();

        let outcome = executor
            .execute(&action(ActionType::Navigate, "example.com/shop", ""), &mut log)
            .await;

        assert_eq!(outcome, ActionOutcome::Success);
        assert_eq!(
            driver.navigated.lock().unwrap().as_slice(),
            ["https://example.com/shop"]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn navigate_retries_and_succeeds_within_bounds() {
        let mut driver = ScriptedDriver::default();
        driver.navigate_failures = AtomicUsize::new(2);
        let (executor, driver) = executor(driver);
        let mut log = ExecutionLog::new();

        let outcome = executor
            .execute(&action(ActionType::Navigate, "https://example.com", ""), &mut log)
            .await;

        assert_eq!(outcome, ActionOutcome::Success);
        assert_eq!(driver.navigated.lock().unwrap().len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn click_succeeds_on_third_attempt_with_no_fourth_try() {
        let mut driver = ScriptedDriver::default();
        driver
            .by_role
            .insert("button:Login".into(), vec![el("tp-1", "button", true, "Login")]);
        driver.click_failures = AtomicUsize::new(2);
        let (executor, driver) = executor(driver);
        let mut log = ExecutionLog::new();

        let outcome = executor
            .execute(&action(ActionType::Click, "Login button", ""), &mut log)
            .await;

        assert_eq!(outcome, ActionOutcome::Success);
        assert_eq!(driver.click_calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn click_fails_after_three_attempts() {
        let mut driver = ScriptedDriver::default();
        driver
            .by_role
            .insert("button:Login".into(), vec![el("tp-1", "button", true, "Login")]);
        driver.click_failures = AtomicUsize::new(10);
        let (executor, driver) = executor(driver);
        let mut log = ExecutionLog::new();

        let outcome = executor
            .execute(&action(ActionType::Click, "Login", ""), &mut log)
            .await;

        assert_eq!(outcome, ActionOutcome::Failure);
        assert_eq!(driver.click_calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn click_not_found_logs_visible_diagnostics() {
        let mut driver = ScriptedDriver::default();
        driver.button_summaries = vec!["Sign in".into(), "Register".into()];
        driver.link_summaries = vec!["Docs".into()];
        let (executor, _) = executor(driver);
        let mut log = ExecutionLog::new();

        let outcome = executor
            .execute(&action(ActionType::Click, "Ghost", ""), &mut log)
            .await;

        assert_eq!(outcome, ActionOutcome::Failure);
        let lines = log.lines();
        assert!(lines.iter().any(|l| l.contains("visible buttons: Sign in | Register")));
        assert!(lines.iter().any(|l| l.contains("visible links: Docs")));
    }

    #[tokio::test(start_paused = true)]
    async fn nav_keyword_click_waits_for_idle_best_effort() {
        let mut driver = ScriptedDriver::default();
        driver.by_text.insert(
            "Products".into(),
            vec![el("tp-1", "a", true, "Products")],
        );
        let (executor, driver) = executor(driver);
        let mut log = ExecutionLog::new();

        let outcome = executor
            .execute(&action(ActionType::Click, "Products", ""), &mut log)
            .await;

        assert_eq!(outcome, ActionOutcome::Success);
        assert_eq!(driver.idle_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn type_does_not_retry_a_failed_fill() {
        let mut driver = ScriptedDriver::default();
        driver
            .by_label
            .insert("email".into(), vec![el("tp-2", "input", true, "")]);
        driver.fill_fails = true;
        let (executor, driver) = executor(driver);
        let mut log = ExecutionLog::new();

        let outcome = executor
            .execute(
                &action(ActionType::Type, "email field", "admin@test.com"),
                &mut log,
            )
            .await;

        assert_eq!(outcome, ActionOutcome::Failure);
        assert_eq!(driver.fill_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn wait_for_element_times_out_to_failure() {
        let (executor, _) = executor(ScriptedDriver::default());
        let mut log = ExecutionLog::new();

        let waiting = action(ActionType::WaitForElement, "Welcome banner", "")
            .with_timeout_secs(2);
        let outcome = executor.execute(&waiting, &mut log).await;

        assert_eq!(outcome, ActionOutcome::Failure);
        assert!(log.lines().iter().any(|l| l.contains("within 2s")));
    }

    #[tokio::test(start_paused = true)]
    async fn verify_text_with_blank_value_fails_before_any_lookup() {
        let (executor, driver) = executor(ScriptedDriver::default());
        let mut log = ExecutionLog::new();

        // Action::new rejects blank values; a hand-built action stands in
        // for data that arrived without going through the constructor.
        let blank = Action {
            action_type: ActionType::VerifyText,
            target: String::new(),
            value: "   ".to_string(),
            timeout_secs: 30,
        };
        let outcome = executor.execute(&blank, &mut log).await;

        assert_eq!(outcome, ActionOutcome::Failure);
        assert_eq!(driver.text_calls.load(Ordering::SeqCst), 0);
        assert!(log.lines().iter().any(|l| l.contains("empty value")));
    }

    #[tokio::test(start_paused = true)]
    async fn verify_text_requires_a_visible_match() {
        let mut driver = ScriptedDriver::default();
        driver.by_text.insert(
            "Welcome".into(),
            vec![el("tp-1", "div", false, "Welcome")],
        );
        let (executor, _) = executor(driver);
        let mut log = ExecutionLog::new();

        let outcome = executor
            .execute(&action(ActionType::VerifyText, "", "Welcome"), &mut log)
            .await;
        assert_eq!(outcome, ActionOutcome::Failure);
    }

    #[tokio::test(start_paused = true)]
    async fn verify_url_is_a_case_sensitive_substring_check() {
        let mut driver = ScriptedDriver::default();
        driver.url = "https://example.com/Dashboard?tab=1".into();
        let (executor, _) = executor(driver);

        let mut log = ExecutionLog::new();
        let hit = executor
            .execute(&action(ActionType::VerifyUrl, "", "Dashboard"), &mut log)
            .await;
        assert_eq!(hit, ActionOutcome::Success);

        let mut log = ExecutionLog::new();
        let miss = executor
            .execute(&action(ActionType::VerifyUrl, "", "dashboard"), &mut log)
            .await;
        assert_eq!(miss, ActionOutcome::Failure);
    }
}
