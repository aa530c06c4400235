//! Error types for console operations.
//!
//! HTTP failures are classified by status code so callers can tell a missing
//! resource from bad credentials. Nothing here is retried.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Result type alias for console operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Categories of console errors, used for user feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// The console could not be reached.
    Network,
    /// The console rejected the credentials.
    Auth,
    /// The requested resource does not exist.
    NotFound,
    /// The console answered with an error status.
    Server,
    /// The caller asked for something the console does not support.
    Usage,
    /// Local file access failed.
    Io,
    /// The console answered, but not in the expected shape.
    Protocol,
}

impl ErrorCategory {
    /// Get a user-friendly description of this error category.
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            Self::Network => "Console unreachable",
            Self::Auth => "Authentication failed",
            Self::NotFound => "Resource not found",
            Self::Server => "Console request failed",
            Self::Usage => "Invalid request",
            Self::Io => "Local file error",
            Self::Protocol => "Unexpected console response",
        }
    }

    /// Get actionable advice for resolving this error category.
    #[must_use]
    pub fn advice(&self) -> &'static str {
        match self {
            Self::Network => "Check the console URL (-c) and that the console is running",
            Self::Auth => "Check the user (-u) and password (-x / -X)",
            Self::NotFound => "Check the fabric name (-f) and the model location",
            Self::Server => "Check the console logs for details",
            Self::Usage => "Run with --help to see the supported actions",
            Self::Io => "Check that the file exists and is readable",
            Self::Protocol => "Check that the console version matches this client",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}

/// Errors that can occur while talking to the console.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The console returned 404.
    #[error("resource not found: {0}")]
    NotFound(String),

    /// The console returned 401.
    #[error("unauthorized request")]
    Unauthorized,

    /// The console returned another status >= 400.
    #[error("request failed with HTTP {status}: {body}")]
    RequestFailed {
        /// HTTP status code.
        status: u16,
        /// Response body, as returned by the console.
        body: String,
    },

    /// Transport-level failure (connection, DNS, TLS...).
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// Action name outside the supported set.
    #[error("action {0} is invalid")]
    InvalidAction(String),

    /// The console URL could not be parsed or joined.
    #[error("invalid console URL: {0}")]
    InvalidUrl(String),

    /// A response lacked a header the protocol relies on.
    #[error("response is missing the {0} header")]
    MissingHeader(&'static str),

    /// The completion header could not be parsed.
    #[error("invalid completion status: {0}")]
    InvalidCompletion(String),

    /// IO error while reading a local file.
    #[error("IO error at {path}: {source}")]
    Io {
        /// Path involved in the error.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: io::Error,
    },
}

impl Error {
    /// Create an IO error with path context.
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Classify an HTTP status.
    ///
    /// Returns `None` for statuses below 400.
    #[must_use]
    pub fn from_status(status: u16, body: impl Into<String>) -> Option<Self> {
        match status {
            0..=399 => None,
            404 => Some(Self::NotFound(body.into())),
            401 => Some(Self::Unauthorized),
            _ => Some(Self::RequestFailed {
                status,
                body: body.into(),
            }),
        }
    }

    /// Get the error category.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::NotFound(_) => ErrorCategory::NotFound,
            Error::Unauthorized => ErrorCategory::Auth,
            Error::RequestFailed { .. } => ErrorCategory::Server,
            Error::Http(_) => ErrorCategory::Network,
            Error::InvalidAction(_) | Error::InvalidUrl(_) => ErrorCategory::Usage,
            Error::MissingHeader(_) | Error::InvalidCompletion(_) => ErrorCategory::Protocol,
            Error::Io { .. } => ErrorCategory::Io,
        }
    }

    /// HTTP status carried by this error, if it came from a response.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::NotFound(_) => Some(404),
            Error::Unauthorized => Some(401),
            Error::RequestFailed { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<ureq::Error> for Error {
    fn from(err: ureq::Error) -> Self {
        match err {
            ureq::Error::StatusCode(code) => {
                Self::from_status(code, String::new()).unwrap_or_else(|| {
                    Self::Http(format!("unexpected HTTP {code}"))
                })
            }
            other => Self::Http(other.to_string()),
        }
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Self::InvalidUrl(err.to_string())
    }
}
