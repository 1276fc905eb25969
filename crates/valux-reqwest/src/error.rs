//! Internal error types for valux-reqwest.

use thiserror::Error;

/// Internal error type for transport and decoding failures.
///
/// Converted into [`valux_core::Error`] at the crate boundary.
#[derive(Debug, Error)]
pub(crate) enum Error {
    /// HTTP request failed before a response arrived.
    #[error("HTTP error: {0}")]
    Reqwest(#[from] reqwest::Error),
    /// JSON (de)serialization failed.
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    /// A request URL could not be built.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

impl From<Error> for valux_core::Error {
    fn from(err: Error) -> Self {
        match err {
            Error::Reqwest(e) if e.is_timeout() => valux_core::Error::timeout().with_source(e),
            Error::Reqwest(e) => valux_core::Error::network_error()
                .with_message("Network error occurred")
                .with_source(e),
            Error::Serde(e) => valux_core::Error::serialization()
                .with_message(e.to_string())
                .with_source(e),
            Error::Url(e) => valux_core::Error::configuration()
                .with_message(format!("Invalid URL: {e}"))
                .with_source(e),
        }
    }
}
