//! Natural-language scenario parsing.
//!
//! [`ScenarioParser`] is the seam the CLI programs against; [`OpenAiParser`]
//! implements it over an OpenAI-compatible chat-completions endpoint. The
//! model is asked for a JSON action array, decoded tolerantly: entries the
//! engine does not recognize are skipped with a warning, and an instruction
//! that yields nothing usable is a [`ParseError::NoActions`]. All external
//! calls are paced by [`RateLimiter`].

pub mod client;
pub mod errors;
pub mod prompt;
pub mod rate_limit;

pub use client::{OpenAiParser, ParserSettings, ScenarioParser};
pub use errors::ParseError;
pub use rate_limit::RateLimiter;
