//! Error types for weir.

use derive_more::{Display, Error, From};

/// Main error type for weir operations.
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

    /// URL parsing error.
    #[display("invalid URL: {_0}")]
    #[from]
    InvalidUrl(url::ParseError),

    /// Invalid request configuration, detected while assembling the wire
    /// request.
    #[display("invalid request: {_0}")]
    #[from(skip)]
    InvalidRequest(#[error(not(source))] String),

    /// JSON serialization error.
    #[display("JSON serialization error: {_0}")]
    #[from]
    JsonSerialization(serde_json::Error),

    /// JSON deserialization error with path context.
    #[display("JSON deserialization error at '{path}': {message}")]
    #[from(skip)]
    JsonDeserialization {
        /// JSON path to the error (e.g., "user.address.city").
        path: String,
        /// Error message.
        message: String,
    },

    /// Response body is not valid UTF-8 text.
    #[display("body decode error: {_0}")]
    #[from]
    BodyDecode(std::string::FromUtf8Error),

    /// The same header key was added twice on one request.
    #[display("header '{_0}' is already set")]
    #[from(skip)]
    DuplicateHeader(#[error(not(source))] String),

    /// The same status code was registered twice.
    #[display("status handler for {_0} is already registered")]
    #[from(skip)]
    DuplicateStatusHandler(#[error(not(source))] u16),
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

    /// Create an invalid request error.
    #[must_use]
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest(message.into())
    }

    /// Create a JSON deserialization error with path context.
    #[must_use]
    pub fn json_deserialization(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::JsonDeserialization {
            path: path.into(),
            message: message.into(),
        }
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

    /// The [`ErrorKind`] this error belongs to, used for handler matching.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Connection(_) | Self::Tls(_) | Self::Timeout => ErrorKind::Transport,
            Self::JsonSerialization(_) | Self::JsonDeserialization { .. } | Self::BodyDecode(_) => {
                ErrorKind::Codec
            }
            Self::InvalidUrl(_)
            | Self::InvalidRequest(_)
            | Self::DuplicateHeader(_)
            | Self::DuplicateStatusHandler(_) => ErrorKind::Request,
        }
    }
}

/// Closed hierarchy of error kinds for handler selection.
///
/// Error handlers declare the kind they want; [`ErrorKind::matches`] decides
/// whether a raised [`Error`] is delivered to them. [`ErrorKind::Any`] sits
/// above every other kind and matches all errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum ErrorKind {
    /// Matches every error.
    #[display("any")]
    Any,
    /// Network, TLS, and timeout failures from the transport.
    #[display("transport")]
    Transport,
    /// JSON encode/decode and body text decode failures.
    #[display("codec")]
    Codec,
    /// Request construction failures (bad URL, builder misuse).
    #[display("request")]
    Request,
}

impl ErrorKind {
    /// Returns `true` if an error of this kind should be delivered to a
    /// handler declared for `self`.
    #[must_use]
    pub fn matches(&self, error: &Error) -> bool {
        *self == Self::Any || *self == error.kind()
    }
}
