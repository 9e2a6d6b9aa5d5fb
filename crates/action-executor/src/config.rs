//! Executor configuration

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::retry::RetryPolicy;

/// Every timeout, settle delay and retry bound the executor uses. Defaults
/// match the tuned values the engine ships with.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecutorConfig {
    /// Navigation attempts and pause between them.
    pub navigation_retry: RetryPolicy,
    /// Per-attempt bound on navigation reaching network idle.
    pub navigation_timeout: Duration,

    /// Click attempts and pause between them.
    pub click_retry: RetryPolicy,
    /// Per-attempt bound on the click itself.
    pub click_timeout: Duration,

    /// Settle delay after a successful navigation or click.
    pub settle_delay: Duration,
    /// Extra settle when a clicked target mentions a navigation keyword.
    pub nav_keyword_settle: Duration,
    /// Best-effort post-click idle wait; its timeout is not a failure.
    pub post_click_idle_timeout: Duration,

    /// How many visible buttons/links to list when a click target is missing.
    pub diagnostics_cap: usize,

    /// Lowercase substrings that mark a click target as likely navigation.
    pub nav_keywords: Vec<String>,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            navigation_retry: RetryPolicy::new(3, Duration::from_secs(2)),
            navigation_timeout: Duration::from_secs(30),
            click_retry: RetryPolicy::new(3, Duration::from_secs(1)),
            click_timeout: Duration::from_secs(10),
            settle_delay: Duration::from_secs(1),
            nav_keyword_settle: Duration::from_secs(2),
            post_click_idle_timeout: Duration::from_secs(5),
            diagnostics_cap: 5,
            nav_keywords: ["product", "dashboard", "menu", "nav"]
                .map(String::from)
                .to_vec(),
        }
    }
}

impl ExecutorConfig {
    /// Whether the target text mentions any navigation keyword.
    pub fn mentions_nav_keyword(&self, target: &str) -> bool {
        let target = target.to_lowercase();
        self.nav_keywords.iter().any(|k| target.contains(k.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_tuned_values() {
        let cfg = ExecutorConfig::default();
        assert_eq!(cfg.navigation_retry.attempts, 3);
        assert_eq!(cfg.navigation_retry.pause, Duration::from_secs(2));
        assert_eq!(cfg.navigation_timeout, Duration::from_secs(30));
        assert_eq!(cfg.click_retry.attempts, 3);
        assert_eq!(cfg.click_timeout, Duration::from_secs(10));
        assert_eq!(cfg.post_click_idle_timeout, Duration::from_secs(5));
        assert_eq!(cfg.diagnostics_cap, 5);
        assert_eq!(cfg.nav_keywords.len(), 4);
    }

    #[test]
    fn nav_keyword_check_is_case_insensitive_substring() {
        let cfg = ExecutorConfig::default();
        assert!(cfg.mentions_nav_keyword("Products"));
        assert!(cfg.mentions_nav_keyword("Go to DASHBOARD"));
        assert!(!cfg.mentions_nav_keyword("Submit"));
    }

    #[test]
    fn partial_config_fills_in_defaults() {
        let cfg: ExecutorConfig =
            serde_json::from_str(r#"{"nav_keywords": ["storefront"]}"#).unwrap();
        assert_eq!(cfg.nav_keywords, vec!["storefront"]);
        assert_eq!(cfg.navigation_timeout, Duration::from_secs(30));
    }
}
