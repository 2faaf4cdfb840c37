//! Error types for sieve.

use std::fmt;

use derive_more::{Display, Error, From};
use http::StatusCode;

// ============================================================================
// Error Transform Trait
// ============================================================================

/// Hook applied to every classified status error before it reaches the caller.
///
/// The transform receives the HTTP status code and the classified error
/// ([`Error::Client`] or [`Error::Server`]) and returns the error the caller
/// will see. Use it to translate status failures into a domain-specific
/// taxonomy, typically through [`Error::custom`].
///
/// Any `Fn(StatusCode, Error) -> Error` closure is a transform.
///
/// Transport failures and decode failures never go through the transform.
///
/// # Example
///
/// ```
/// use sieve_core::{Error, ErrorTransform, StatusCode};
///
/// #[derive(Debug, derive_more::Display, derive_more::Error)]
/// #[display("user not found")]
/// struct UserNotFound;
///
/// let transform = |status: StatusCode, err: Error| {
///     if status == StatusCode::NOT_FOUND {
///         Error::custom(UserNotFound)
///     } else {
///         err
///     }
/// };
///
/// let err = transform.transform(StatusCode::NOT_FOUND, Error::timeout());
/// assert!(err.downcast_ref::<UserNotFound>().is_some());
/// ```
pub trait ErrorTransform: Send + Sync + 'static {
    /// Turn a classified status error into the error returned to the caller.
    fn transform(&self, status: StatusCode, error: Error) -> Error;
}

impl<F> ErrorTransform for F
where
    F: Fn(StatusCode, Error) -> Error + Send + Sync + 'static,
{
    fn transform(&self, status: StatusCode, error: Error) -> Error {
        self(status, error)
    }
}

/// Transform that returns the classified error unchanged.
///
/// This is the transform used by [`crate::ResponseExecutor::new`].
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityTransform;

impl ErrorTransform for IdentityTransform {
    fn transform(&self, _status: StatusCode, error: Error) -> Error {
        error
    }
}

// ============================================================================
// Status Error
// ============================================================================

/// Diagnostic context of a response with a status code of 400 or above.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub struct StatusError {
    status: StatusCode,
    request_id: String,
    message: String,
}

impl StatusError {
    /// Creates a new status error.
    #[must_use]
    pub fn new(status: StatusCode, request_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status,
            request_id: request_id.into(),
            message: message.into(),
        }
    }

    /// HTTP status code.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// Request identifier read from the response headers, empty if unknown.
    #[must_use]
    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    /// Error message, either the response body or the status reason phrase.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Tag this error as a client error (below 500) or a server error.
    #[must_use]
    pub fn classify(self) -> Error {
        if self.status.as_u16() < 500 {
            Error::Client(self)
        } else {
            Error::Server(self)
        }
    }
}

impl fmt::Display for StatusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HTTP {}", self.status.as_u16())?;
        if !self.request_id.is_empty() {
            write!(f, " (request id {})", self.request_id)?;
        }
        write!(f, ": {}", self.message)
    }
}

// ============================================================================
// Error Type
// ============================================================================

/// Main error type for sieve operations.
#[derive(Debug, Display, Error, From)]
pub enum Error {
    /// Network/connection errors.
    #[display("connection error: {_0}")]
    #[from(skip)]
    Connection(#[error(not(source))] String),

    /// TLS/SSL errors.
    #[display("TLS error: {_0}")]
    #[from(skip)]
    Tls(#[error(not(source))] String),

    /// Request timeout.
    #[display("request timeout")]
    #[from(skip)]
    Timeout,

    /// The transport could not send the request as given.
    #[display("invalid request: {_0}")]
    #[from(skip)]
    InvalidRequest(#[error(not(source))] String),

    /// The server rejected the request (4xx).
    #[display("client error: {_0}")]
    #[from(skip)]
    Client(StatusError),

    /// The server failed to handle the request (5xx).
    #[display("server error: {_0}")]
    #[from(skip)]
    Server(StatusError),

    /// Reading the response body failed.
    #[display("failed to read response body: {_0}")]
    #[from(skip)]
    Body(#[error(not(source))] String),

    /// The response body is not valid UTF-8.
    #[display("response body is not valid UTF-8: {_0}")]
    #[from]
    Utf8(std::string::FromUtf8Error),

    /// JSON deserialization error with path context.
    #[display("JSON deserialization error at '{path}': {message}")]
    #[from(skip)]
    JsonDeserialization {
        /// JSON path to the error (e.g., "user.address.city").
        path: String,
        /// Error message.
        message: String,
    },

    /// Caller-defined error, usually produced by an [`ErrorTransform`].
    #[display("{_0}")]
    #[from(skip)]
    Custom(#[error(not(source))] Box<dyn std::error::Error + Send + Sync>),
}

/// Result type alias using [`crate::Error`].
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a connection error.
    #[must_use]
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection(message.into())
    }

    /// Create a TLS error.
    #[must_use]
    pub fn tls(message: impl Into<String>) -> Self {
        Self::Tls(message.into())
    }

    /// Create a timeout error.
    #[must_use]
    pub const fn timeout() -> Self {
        Self::Timeout
    }

    /// Create an invalid request error.
    #[must_use]
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest(message.into())
    }

    /// Create a body read error.
    #[must_use]
    pub fn body(message: impl Into<String>) -> Self {
        Self::Body(message.into())
    }

    /// Create a JSON deserialization error with path context.
    #[must_use]
    pub fn json_deserialization(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::JsonDeserialization {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Wrap a caller-defined error.
    #[must_use]
    pub fn custom(error: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::Custom(error.into())
    }

    /// Returns `true` if this is a timeout error.
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout)
    }

    /// Returns `true` if this is a connection error.
    #[must_use]
    pub const fn is_connection(&self) -> bool {
        matches!(self, Self::Connection(_))
    }

    /// Returns `true` if the transport failed to produce a response.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::Connection(_) | Self::Tls(_) | Self::Timeout | Self::InvalidRequest(_)
        )
    }

    /// Returns `true` if this is a client error (4xx).
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        matches!(self, Self::Client(_))
    }

    /// Returns `true` if this is a server error (5xx).
    #[must_use]
    pub const fn is_server_error(&self) -> bool {
        matches!(self, Self::Server(_))
    }

    /// Returns `true` if the response body could not be read or decoded.
    #[must_use]
    pub const fn is_decode(&self) -> bool {
        matches!(
            self,
            Self::Body(_) | Self::Utf8(_) | Self::JsonDeserialization { .. }
        )
    }

    /// Returns the status context if this is a client or server error.
    #[must_use]
    pub const fn status_error(&self) -> Option<&StatusError> {
        match self {
            Self::Client(err) | Self::Server(err) => Some(err),
            _ => None,
        }
    }

    /// Returns the HTTP status code if this is a client or server error.
    #[must_use]
    pub fn status(&self) -> Option<StatusCode> {
        self.status_error().map(StatusError::status)
    }

    /// Returns the request id if this is a client or server error.
    #[must_use]
    pub fn request_id(&self) -> Option<&str> {
        self.status_error().map(StatusError::request_id)
    }

    /// Returns `true` if this is a 404 Not Found error.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(StatusCode::NOT_FOUND)
    }

    /// Downcast a [`Error::Custom`] payload to a concrete type.
    #[must_use]
    pub fn downcast_ref<T: std::error::Error + 'static>(&self) -> Option<&T> {
        match self {
            Self::Custom(inner) => inner.downcast_ref::<T>(),
            _ => None,
        }
    }
}
