//! Parser error types

use thiserror::Error;

/// Parsing error enumeration.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The instruction produced no usable actions, either because the model
    /// returned an empty array or because nothing in it was recognized.
    #[error("the instruction produced no recognizable actions")]
    NoActions,

    /// The response arrived but could not be decoded.
    #[error("malformed model response: {0}")]
    Malformed(String),

    /// The request never produced a usable response.
    #[error("transport failure talking to the model endpoint: {0}")]
    Transport(String),

    /// The endpoint refused the request for pacing reasons.
    #[error("model endpoint rate limited the request")]
    RateLimited,

    /// A required credential is absent from the environment.
    #[error("missing credential: {0}")]
    MissingCredential(&'static str),
}
