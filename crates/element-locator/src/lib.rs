//! Target normalization and element resolution.
//!
//! Natural-language targets ("the login button", "email field") are noisy.
//! [`normalize`] strips the descriptive suffix; [`ElementResolver`] runs an
//! ordered chain of lookup strategies over the normalized and raw forms and
//! returns the best candidate, or nothing after full exhaustion. Resolution
//! never errors: a driver failure inside one strategy is logged and counts as
//! no match for that strategy.

pub mod normalize;
pub mod resolver;
pub mod types;

pub use normalize::{normalize, TargetVariants};
pub use resolver::ElementResolver;
pub use types::{Candidate, ClickStrategy, InputStrategy};
