//! Structured error handling for valux operations.

use serde_json::Value;
use strum::{AsRefStr, Display, EnumString, IntoStaticStr};
use thiserror::Error;

/// Type alias for boxed dynamic errors that can be sent across threads.
pub type BoxedError = Box<dyn std::error::Error + Send + Sync>;

/// Type alias for Results with our custom Error type.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Categories of errors that can occur in valux operations.
///
/// The first three kinds are the only ones the HTTP gateway produces. The
/// remaining kinds are local failures raised before or after a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(AsRefStr, Display, EnumString, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum ErrorKind {
    /// The server rejected the request or reported a failure.
    Api,
    /// The request was sent but no response arrived, or it timed out.
    Network,
    /// The session is invalid and the caller must log in again.
    Authentication,
    /// Input to a transformer or request builder was malformed.
    InvalidInput,
    /// A response could not be decoded into the expected shape.
    Serialization,
    /// A requested resource does not exist.
    NotFound,
    /// Token persistence failed.
    Storage,
    /// Configuration error.
    Configuration,
    /// The operation is not available on this backend.
    Unsupported,
}

impl ErrorKind {
    /// Returns the message shown when an error carries none of its own.
    pub const fn default_message(&self) -> &'static str {
        match self {
            Self::Api => "API request failed",
            Self::Network => "Network error occurred",
            Self::Authentication => "Authentication failed. Please login again.",
            Self::InvalidInput => "Invalid input",
            Self::Serialization => "Unexpected response format",
            Self::NotFound => "Resource not found",
            Self::Storage => "Token storage failed",
            Self::Configuration => "Invalid configuration",
            Self::Unsupported => "Operation not supported",
        }
    }

    /// Check if this error kind is typically retryable by the caller.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Network)
    }
}

/// Structured error type with classification and HTTP context.
#[must_use]
#[derive(Debug, Error)]
#[error("[{kind}]: {}", self.message())]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Primary error message.
    pub message: Option<String>,
    /// HTTP status code of the response that caused the error.
    pub status: Option<u16>,
    /// Application error code provided by the server.
    pub code: Option<String>,
    /// Additional server-provided details.
    pub details: Option<Value>,
    /// Underlying source error, if any.
    #[source]
    pub source: Option<BoxedError>,
}

impl Error {
    /// Creates a new error with the given kind.
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            message: None,
            status: None,
            code: None,
            details: None,
            source: None,
        }
    }

    /// Creates a new error from a source error.
    pub fn from_source(kind: ErrorKind, source: impl Into<BoxedError>) -> Self {
        Self::new(kind).with_source(source)
    }

    /// Creates a new API error for the given HTTP status.
    pub fn api(status: u16) -> Self {
        Self::new(ErrorKind::Api).with_status(status)
    }

    /// Creates a new network error.
    pub fn network_error() -> Self {
        Self::new(ErrorKind::Network)
    }

    /// Creates the network error reported when the request budget runs out.
    pub fn timeout() -> Self {
        Self::network_error().with_message("Request timeout")
    }

    /// Creates a new authentication error.
    pub fn authentication() -> Self {
        Self::new(ErrorKind::Authentication)
    }

    /// Creates a new invalid input error.
    pub fn invalid_input() -> Self {
        Self::new(ErrorKind::InvalidInput)
    }

    /// Creates a new serialization error.
    pub fn serialization() -> Self {
        Self::new(ErrorKind::Serialization)
    }

    /// Creates a new not found error.
    pub fn not_found() -> Self {
        Self::new(ErrorKind::NotFound)
    }

    /// Creates a new storage error.
    pub fn storage() -> Self {
        Self::new(ErrorKind::Storage)
    }

    /// Creates a new configuration error.
    pub fn configuration() -> Self {
        Self::new(ErrorKind::Configuration)
    }

    /// Creates a new unsupported operation error.
    pub fn unsupported() -> Self {
        Self::new(ErrorKind::Unsupported)
    }

    /// Adds a message to this error.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Sets the HTTP status code.
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    /// Sets the application error code.
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Sets the server-provided details.
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Sets the source of the error.
    pub fn with_source(mut self, source: impl Into<BoxedError>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Returns the error kind.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the message to display to a user, verbatim.
    pub fn message(&self) -> &str {
        self.message
            .as_deref()
            .unwrap_or_else(|| self.kind.default_message())
    }

    /// Returns true if the server rejected the request.
    pub fn is_api_error(&self) -> bool {
        matches!(self.kind, ErrorKind::Api)
    }

    /// Returns true if no response was received.
    pub fn is_network_error(&self) -> bool {
        matches!(self.kind, ErrorKind::Network)
    }

    /// Returns true if the caller must log in again.
    pub fn is_auth_error(&self) -> bool {
        matches!(self.kind, ErrorKind::Authentication)
    }

    /// Returns true if this is an API error with the given status code.
    pub fn has_status(&self, status: u16) -> bool {
        self.status == Some(status)
    }

    /// Check if this error is retryable based on its kind.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        self.kind.is_retryable()
    }
}

impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Self {
        let message = error.to_string();
        Self::from_source(ErrorKind::Serialization, error).with_message(message)
    }
}

impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Self::from_source(ErrorKind::Storage, error).with_message("Token storage I/O failed")
    }
}
