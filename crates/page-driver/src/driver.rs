//! The `PageDriver` capability boundary

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::DriverError;

/// Accessible roles the engine resolves against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    Button,
    Link,
}

impl Role {
    pub fn name(&self) -> &'static str {
        match self {
            Role::Button => "button",
            Role::Link => "link",
        }
    }
}

/// How a name is compared during role lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextMatch {
    /// Trimmed accessible name equals the needle.
    Exact,
    /// Case-insensitive substring match.
    Contains,
}

/// Semantic input kinds used by the input-resolution heuristics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    Email,
    Password,
}

impl InputKind {
    pub fn html_type(&self) -> &'static str {
        match self {
            InputKind::Email => "email",
            InputKind::Password => "password",
        }
    }
}

/// What a navigation waits for before returning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitMode {
    /// Return as soon as the navigation is committed.
    None,
    /// Wait for the document to finish loading.
    DomReady,
    /// Wait for the document to load and the page to go quiet.
    NetworkIdle,
}

/// Opaque handle to a page element, valid until the next navigation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementHandle(pub String);

/// One element match with the metadata the resolver disambiguates on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ElementInfo {
    #[serde(rename = "id")]
    pub handle: ElementHandle,

    /// Lowercase tag name.
    pub tag: String,

    /// Explicit `role` attribute, when present.
    #[serde(default)]
    pub role: Option<String>,

    pub visible: bool,

    /// Trimmed visible text, truncated for logging.
    #[serde(default)]
    pub text: String,
}

impl ElementInfo {
    /// Whether the element is an interactive link/button by tag or role.
    pub fn is_interactive(&self) -> bool {
        matches!(self.tag.as_str(), "a" | "button")
            || matches!(self.role.as_deref(), Some("link") | Some("button"))
    }
}

/// The browser capability set the engine's policy runs against.
///
/// Lookup methods return zero or more matches and only fail on driver-level
/// problems; "nothing matched" is an empty vec, never an error.
#[async_trait]
pub trait PageDriver: Send + Sync {
    /// Navigate to `url` and wait per `mode`, bounded by `timeout`.
    async fn navigate(
        &self,
        url: &str,
        mode: WaitMode,
        timeout: Duration,
    ) -> Result<(), DriverError>;

    /// Wait for the page to go quiet, bounded by `timeout`.
    async fn wait_network_idle(&self, timeout: Duration) -> Result<(), DriverError>;

    /// Elements with the given accessible role whose name matches `name`.
    async fn find_by_role(
        &self,
        role: Role,
        name: &str,
        mode: TextMatch,
    ) -> Result<Vec<ElementInfo>, DriverError>;

    /// Innermost elements whose trimmed text equals `text` exactly.
    async fn find_by_text(&self, text: &str) -> Result<Vec<ElementInfo>, DriverError>;

    /// Inputs associated with a label matching `label`.
    async fn find_by_label(&self, label: &str) -> Result<Vec<ElementInfo>, DriverError>;

    /// Inputs whose placeholder matches `placeholder`.
    async fn find_by_placeholder(&self, placeholder: &str)
        -> Result<Vec<ElementInfo>, DriverError>;

    /// Inputs of the given semantic type.
    async fn find_input_of_kind(&self, kind: InputKind) -> Result<Vec<ElementInfo>, DriverError>;

    /// Inputs whose name or id attribute contains `needle` (case-insensitive).
    async fn find_input_by_attr(&self, needle: &str) -> Result<Vec<ElementInfo>, DriverError>;

    /// Click a previously resolved element.
    async fn click(&self, handle: &ElementHandle, timeout: Duration) -> Result<(), DriverError>;

    /// Clear a previously resolved input and set its value.
    async fn fill(&self, handle: &ElementHandle, text: &str) -> Result<(), DriverError>;

    /// Block until an element with exact text `text` is present.
    async fn wait_for_text(&self, text: &str, timeout: Duration) -> Result<(), DriverError>;

    /// Current page URL.
    async fn current_url(&self) -> Result<String, DriverError>;

    /// Visibility of a previously resolved element. A handle that no longer
    /// resolves reads as not visible.
    async fn is_visible(&self, handle: &ElementHandle) -> Result<bool, DriverError>;

    /// Up to `cap` visible elements of the role, as short descriptions.
    /// Diagnostics only.
    async fn visible_summaries(&self, role: Role, cap: usize)
        -> Result<Vec<String>, DriverError>;
}
