//! Ordered-strategy element resolution

use std::sync::Arc;

use page_driver::{DriverError, ElementInfo, InputKind, PageDriver, Role, TextMatch};
use tracing::{debug, warn};

use crate::normalize::TargetVariants;
use crate::types::{Candidate, ClickStrategy, InputStrategy};

/// Resolves natural-language targets to page elements by running lookup
/// strategies in a fixed order. Not finding anything is a normal outcome,
/// reported as `None`/`false`, never as an error.
pub struct ElementResolver {
    driver: Arc<dyn PageDriver>,
}

impl ElementResolver {
    pub fn new(driver: Arc<dyn PageDriver>) -> Self {
        Self { driver }
    }

    /// Resolve a click target. Strategies are tried in chain order; within a
    /// strategy the normalized form is tried before the raw form.
    pub async fn resolve_click(&self, target: &str) -> Option<Candidate> {
        let variants = TargetVariants::of(target);

        for strategy in ClickStrategy::chain() {
            for needle in variants.iter() {
                let matches = match self.run_click_strategy(strategy, needle).await {
                    Ok(matches) => matches,
                    Err(err) => {
                        warn!(
                            strategy = strategy.name(),
                            needle,
                            error = %err,
                            "click lookup failed, moving on"
                        );
                        continue;
                    }
                };
                let count = matches.len();
                if let Some(best) = pick_click_match(strategy, matches) {
                    debug!(
                        strategy = strategy.name(),
                        needle,
                        count,
                        handle = %best.handle.0,
                        "click target resolved"
                    );
                    return Some(Candidate::from_info(best, strategy.name(), count));
                }
                debug!(strategy = strategy.name(), needle, "no match");
            }
        }

        debug!(target, "click target not found after full chain");
        None
    }

    /// Resolve an input target for typing. First strategy with a match wins.
    pub async fn resolve_input(&self, target: &str) -> Option<Candidate> {
        let variants = TargetVariants::of(target);
        let target_lower = target.to_lowercase();

        for strategy in InputStrategy::chain() {
            for needle in variants.iter() {
                let matches = match self
                    .run_input_strategy(strategy, needle, &target_lower)
                    .await
                {
                    Ok(matches) => matches,
                    Err(err) => {
                        warn!(
                            strategy = strategy.name(),
                            needle,
                            error = %err,
                            "input lookup failed, moving on"
                        );
                        continue;
                    }
                };
                let count = matches.len();
                if let Some(best) = matches.into_iter().next() {
                    debug!(
                        strategy = strategy.name(),
                        needle,
                        count,
                        handle = %best.handle.0,
                        "input target resolved"
                    );
                    return Some(Candidate::from_info(best, strategy.name(), count));
                }
                debug!(strategy = strategy.name(), needle, "no match");
            }
        }

        debug!(target, "input target not found after full chain");
        None
    }

    /// Whether an element with exactly `text` is visible on the page.
    /// Several matches count as present when any one of them is visible.
    pub async fn resolve_visible_text(&self, text: &str) -> bool {
        match self.driver.find_by_text(text).await {
            Ok(matches) => matches.iter().any(|m| m.visible),
            Err(err) => {
                warn!(text, error = %err, "text lookup failed, treating as absent");
                false
            }
        }
    }

    async fn run_click_strategy(
        &self,
        strategy: ClickStrategy,
        needle: &str,
    ) -> Result<Vec<ElementInfo>, DriverError> {
        match strategy {
            ClickStrategy::RoleButtonExact => {
                self.driver
                    .find_by_role(Role::Button, needle, TextMatch::Exact)
                    .await
            }
            ClickStrategy::RoleLinkExact => {
                self.driver
                    .find_by_role(Role::Link, needle, TextMatch::Exact)
                    .await
            }
            ClickStrategy::TextExact => self.driver.find_by_text(needle).await,
            ClickStrategy::RoleButtonContains => {
                self.driver
                    .find_by_role(Role::Button, needle, TextMatch::Contains)
                    .await
            }
            ClickStrategy::RoleLinkContains => {
                self.driver
                    .find_by_role(Role::Link, needle, TextMatch::Contains)
                    .await
            }
        }
    }

    async fn run_input_strategy(
        &self,
        strategy: InputStrategy,
        needle: &str,
        target_lower: &str,
    ) -> Result<Vec<ElementInfo>, DriverError> {
        match strategy {
            InputStrategy::Label => self.driver.find_by_label(needle).await,
            InputStrategy::Placeholder => self.driver.find_by_placeholder(needle).await,
            InputStrategy::EmailType => {
                if target_lower.contains("email") {
                    self.driver.find_input_of_kind(InputKind::Email).await
                } else {
                    Ok(Vec::new())
                }
            }
            InputStrategy::PasswordType => {
                if target_lower.contains("password") {
                    self.driver.find_input_of_kind(InputKind::Password).await
                } else {
                    Ok(Vec::new())
                }
            }
            InputStrategy::NameOrId => self.driver.find_input_by_attr(needle).await,
        }
    }
}

/// Disambiguate a multi-match. The bare-text strategy matches headings and
/// spans too, so it prefers something link- or button-like; everywhere else
/// the first DOM-order match wins.
fn pick_click_match(strategy: ClickStrategy, mut matches: Vec<ElementInfo>) -> Option<ElementInfo> {
    if matches.is_empty() {
        return None;
    }
    let index = if strategy == ClickStrategy::TextExact && matches.len() > 1 {
        matches
            .iter()
            .position(ElementInfo::is_interactive)
            .unwrap_or(0)
    } else {
        0
    };
    Some(matches.remove(index))
}
