//! Resolution strategies and candidate types

use page_driver::{ElementHandle, ElementInfo};

/// Click lookup strategies, in fallback order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickStrategy {
    RoleButtonExact,
    RoleLinkExact,
    TextExact,
    RoleButtonContains,
    RoleLinkContains,
}

impl ClickStrategy {
    /// The full chain, evaluated left to right; first non-empty wins.
    pub fn chain() -> [ClickStrategy; 5] {
        [
            ClickStrategy::RoleButtonExact,
            ClickStrategy::RoleLinkExact,
            ClickStrategy::TextExact,
            ClickStrategy::RoleButtonContains,
            ClickStrategy::RoleLinkContains,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            ClickStrategy::RoleButtonExact => "role-button-exact",
            ClickStrategy::RoleLinkExact => "role-link-exact",
            ClickStrategy::TextExact => "text-exact",
            ClickStrategy::RoleButtonContains => "role-button-contains",
            ClickStrategy::RoleLinkContains => "role-link-contains",
        }
    }
}

/// Input lookup strategies, in fallback order. The two type-based
/// strategies only apply when the target text mentions that kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputStrategy {
    Label,
    Placeholder,
    EmailType,
    PasswordType,
    NameOrId,
}

impl InputStrategy {
    pub fn chain() -> [InputStrategy; 5] {
        [
            InputStrategy::Label,
            InputStrategy::Placeholder,
            InputStrategy::EmailType,
            InputStrategy::PasswordType,
            InputStrategy::NameOrId,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            InputStrategy::Label => "label",
            InputStrategy::Placeholder => "placeholder",
            InputStrategy::EmailType => "email-type",
            InputStrategy::PasswordType => "password-type",
            InputStrategy::NameOrId => "name-or-id",
        }
    }
}

/// A resolved element, valid for the current action only.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub handle: ElementHandle,
    /// Name of the strategy that produced the match.
    pub strategy: &'static str,
    /// How many elements the winning strategy matched.
    pub match_count: usize,
    pub tag: String,
    pub role: Option<String>,
    pub visible: bool,
}

impl Candidate {
    pub fn from_info(info: ElementInfo, strategy: &'static str, match_count: usize) -> Self {
        Self {
            handle: info.handle,
            strategy,
            match_count,
            tag: info.tag,
            role: info.role,
            visible: info.visible,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn click_chain_orders_exact_before_contains() {
        let chain = ClickStrategy::chain();
        assert_eq!(chain[0], ClickStrategy::RoleButtonExact);
        assert_eq!(chain[2], ClickStrategy::TextExact);
        assert_eq!(chain[4], ClickStrategy::RoleLinkContains);
    }

    #[test]
    fn input_chain_starts_with_label() {
        assert_eq!(InputStrategy::chain()[0], InputStrategy::Label);
        assert_eq!(InputStrategy::chain()[4], InputStrategy::NameOrId);
    }
}
