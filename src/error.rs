//! Error types for the TMDB data layer
//!
//! Every request failure is normalized into one of three kinds so consumers
//! can distinguish "the request never got an answer" from "the server said
//! no" from "the answer made no sense" without inspecting library internals.

use thiserror::Error;

/// Unified error type for API requests.
///
/// Payloads are plain strings rather than the underlying error types so the
/// error stays `Clone`-able; pagination state holds on to the last failure
/// long after the request that produced it is gone.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    /// The request produced no HTTP response (connect failure, DNS, timeout)
    #[error("request failed: {0}")]
    Transport(String),

    /// The server answered with a non-success HTTP status
    #[error("server returned HTTP {0}")]
    Network(u16),

    /// The response body could not be decoded into the expected shape
    #[error("failed to decode response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        ApiError::Transport(err.to_string())
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Decode(err.to_string())
    }
}

/// Convenience Result type for the data layer.
pub type ApiResult<T> = std::result::Result<T, ApiError>;
