//! Browser automation primitives for the testpilot engine.
//!
//! The engine is policy layered over a small capability set: navigate, look
//! elements up by role/text/label/placeholder, click, fill, wait for text to
//! appear, read the current URL and element visibility. [`PageDriver`] is that
//! capability boundary; [`ChromeDriver`] implements it against a real Chrome
//! via `headless_chrome`.

pub mod chrome;
pub mod driver;
pub mod errors;

mod js;

pub use chrome::{ChromeDriver, LaunchProfile};
pub use driver::{ElementHandle, ElementInfo, InputKind, PageDriver, Role, TextMatch, WaitMode};
pub use errors::DriverError;
