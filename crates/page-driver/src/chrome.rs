//! `headless_chrome` implementation of the driver boundary.
//!
//! CDP calls through `headless_chrome` are blocking, so every page touch runs
//! inside `tokio::task::spawn_blocking` with its own clone of the tab handle.
//! DOM lookups are injected JavaScript (see `js`); matches are tagged with a
//! `data-tp-eid` attribute so later interactions can re-select them cheaply.

use std::ffi::OsStr;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use headless_chrome::{Browser, LaunchOptions, Tab};
use tokio::task;
use tokio::time::{sleep, timeout, Instant};
use tracing::debug;

use crate::driver::{
    ElementHandle, ElementInfo, InputKind, PageDriver, Role, TextMatch, WaitMode,
};
use crate::errors::DriverError;
use crate::js;

const READY_POLL_INTERVAL: Duration = Duration::from_millis(250);
const READY_QUIET_PERIOD: Duration = Duration::from_millis(500);

/// Browser launch settings.
#[derive(Debug, Clone)]
pub struct LaunchProfile {
    pub headless: bool,
    pub idle_timeout: Duration,
}

impl Default for LaunchProfile {
    fn default() -> Self {
        Self {
            headless: true,
            idle_timeout: Duration::from_secs(60),
        }
    }
}

/// Chrome-backed [`PageDriver`]. One tab, owned for the process lifetime.
pub struct ChromeDriver {
    _browser: Browser,
    tab: Arc<Tab>,
}

impl ChromeDriver {
    /// Launch Chrome and open a blank tab. Blocking; call it from a blocking
    /// context (`spawn_blocking`) when already inside the runtime.
    pub fn launch(profile: &LaunchProfile) -> Result<Self, DriverError> {
        let options = LaunchOptions {
            headless: profile.headless,
            idle_browser_timeout: profile.idle_timeout,
            args: vec![
                OsStr::new("--no-first-run"),
                OsStr::new("--no-default-browser-check"),
                OsStr::new("--disable-blink-features=AutomationControlled"),
            ],
            ..Default::default()
        };

        let browser = Browser::new(options).map_err(|e| DriverError::Launch(e.to_string()))?;
        let tab = browser
            .new_tab()
            .map_err(|e| DriverError::Launch(e.to_string()))?;

        Ok(Self {
            _browser: browser,
            tab,
        })
    }

    async fn eval(&self, expr: String) -> Result<serde_json::Value, DriverError> {
        let tab = self.tab.clone();
        let object = task::spawn_blocking(move || {
            tab.evaluate(&expr, false)
                .map_err(|e| DriverError::Script(e.to_string()))
        })
        .await
        .map_err(|e| DriverError::Internal(e.to_string()))??;

        Ok(object.value.unwrap_or(serde_json::Value::Null))
    }

    /// Evaluate a script that returns `JSON.stringify(...)` and decode it.
    async fn eval_json(&self, expr: String) -> Result<serde_json::Value, DriverError> {
        match self.eval(expr).await? {
            serde_json::Value::String(raw) => serde_json::from_str(&raw)
                .map_err(|e| DriverError::Script(format!("bad lookup payload: {e}"))),
            other => Ok(other),
        }
    }

    async fn find(&self, expr: String) -> Result<Vec<ElementInfo>, DriverError> {
        let value = self.eval_json(expr).await?;
        serde_json::from_value(value)
            .map_err(|e| DriverError::Script(format!("bad element payload: {e}")))
    }

    /// Poll document readiness until `deadline`, then let the page sit for a
    /// short quiet period. Approximates network-idle; see DESIGN notes.
    async fn wait_ready(&self, deadline: Instant) -> Result<(), DriverError> {
        loop {
            let state = self.eval("document.readyState".to_string()).await?;
            if state.as_str() == Some("complete") {
                let remaining = deadline.saturating_duration_since(Instant::now());
                sleep(READY_QUIET_PERIOD.min(remaining)).await;
                return Ok(());
            }
            if Instant::now() >= deadline {
                return Err(DriverError::Timeout("page to go idle".to_string()));
            }
            sleep(READY_POLL_INTERVAL).await;
        }
    }

    fn selector_for(handle: &ElementHandle) -> String {
        format!(r#"[data-tp-eid="{}"]"#, handle.0)
    }
}

#[async_trait]
impl PageDriver for ChromeDriver {
    async fn navigate(
        &self,
        url: &str,
        mode: WaitMode,
        limit: Duration,
    ) -> Result<(), DriverError> {
        debug!(url, ?mode, "navigating");
        let deadline = Instant::now() + limit;

        let tab = self.tab.clone();
        let target = url.to_string();
        let nav = task::spawn_blocking(move || -> Result<(), DriverError> {
            tab.navigate_to(&target)
                .map_err(|e| DriverError::Navigation(e.to_string()))?;
            tab.wait_until_navigated()
                .map_err(|e| DriverError::Navigation(e.to_string()))?;
            Ok(())
        });

        match timeout(limit, nav).await {
            Err(_) => return Err(DriverError::Timeout(format!("navigation to {url}"))),
            Ok(join) => join.map_err(|e| DriverError::Internal(e.to_string()))??,
        }

        if matches!(mode, WaitMode::NetworkIdle) {
            self.wait_ready(deadline).await?;
        }
        Ok(())
    }

    async fn wait_network_idle(&self, limit: Duration) -> Result<(), DriverError> {
        self.wait_ready(Instant::now() + limit).await
    }

    async fn find_by_role(
        &self,
        role: Role,
        name: &str,
        mode: TextMatch,
    ) -> Result<Vec<ElementInfo>, DriverError> {
        let contains = matches!(mode, TextMatch::Contains);
        self.find(js::role_query(role, name, contains)).await
    }

    async fn find_by_text(&self, text: &str) -> Result<Vec<ElementInfo>, DriverError> {
        self.find(js::text_query(text)).await
    }

    async fn find_by_label(&self, label: &str) -> Result<Vec<ElementInfo>, DriverError> {
        self.find(js::label_query(label)).await
    }

    async fn find_by_placeholder(
        &self,
        placeholder: &str,
    ) -> Result<Vec<ElementInfo>, DriverError> {
        self.find(js::placeholder_query(placeholder)).await
    }

    async fn find_input_of_kind(&self, kind: InputKind) -> Result<Vec<ElementInfo>, DriverError> {
        self.find(js::input_type_query(kind)).await
    }

    async fn find_input_by_attr(&self, needle: &str) -> Result<Vec<ElementInfo>, DriverError> {
        self.find(js::input_attr_query(needle)).await
    }

    async fn click(&self, handle: &ElementHandle, limit: Duration) -> Result<(), DriverError> {
        let tab = self.tab.clone();
        let selector = Self::selector_for(handle);
        let op = task::spawn_blocking(move || -> Result<(), DriverError> {
            let element = tab
                .find_element(&selector)
                .map_err(|e| DriverError::Interaction(format!("element lookup: {e}")))?;
            element
                .click()
                .map_err(|e| DriverError::Interaction(format!("click: {e}")))?;
            Ok(())
        });

        match timeout(limit, op).await {
            Err(_) => Err(DriverError::Timeout("click".to_string())),
            Ok(join) => join.map_err(|e| DriverError::Internal(e.to_string()))?,
        }
    }

    async fn fill(&self, handle: &ElementHandle, text: &str) -> Result<(), DriverError> {
        match self.eval(js::fill_script(&handle.0, text)).await? {
            serde_json::Value::String(s) if s == "ok" => Ok(()),
            serde_json::Value::String(s) if s == "missing" => Err(DriverError::Interaction(
                "input handle no longer resolves".to_string(),
            )),
            other => Err(DriverError::Interaction(format!(
                "unexpected fill result: {other}"
            ))),
        }
    }

    async fn wait_for_text(&self, text: &str, limit: Duration) -> Result<(), DriverError> {
        let deadline = Instant::now() + limit;
        loop {
            if !self.find(js::text_query(text)).await?.is_empty() {
                return Ok(());
            }
            if Instant::now() >= deadline {
                return Err(DriverError::Timeout(format!("text '{text}' to appear")));
            }
            sleep(READY_POLL_INTERVAL).await;
        }
    }

    async fn current_url(&self) -> Result<String, DriverError> {
        let tab = self.tab.clone();
        task::spawn_blocking(move || tab.get_url())
            .await
            .map_err(|e| DriverError::Internal(e.to_string()))
    }

    async fn is_visible(&self, handle: &ElementHandle) -> Result<bool, DriverError> {
        let value = self.eval_json(js::visibility_query(&handle.0)).await?;
        Ok(value.as_bool().unwrap_or(false))
    }

    async fn visible_summaries(
        &self,
        role: Role,
        cap: usize,
    ) -> Result<Vec<String>, DriverError> {
        let value = self.eval_json(js::summaries_query(role, cap)).await?;
        serde_json::from_value(value)
            .map_err(|e| DriverError::Script(format!("bad summary payload: {e}")))
    }
}
