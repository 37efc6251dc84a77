//! Error taxonomy for the GQL client.

use std::fmt;

use reqwest::StatusCode;
use thiserror::Error;

use crate::retry::AttemptError;

/// Transport failure detail captured from reqwest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpErrorInfo {
    /// Error message.
    pub message: String,
    /// Whether the failure was a timeout.
    pub is_timeout: bool,
    /// Whether the failure was a connection failure.
    pub is_connect: bool,
    /// Whether the failure occurred while sending the request.
    pub is_request: bool,
}

impl From<reqwest::Error> for HttpErrorInfo {
    fn from(err: reqwest::Error) -> Self {
        Self {
            message: err.to_string(),
            is_timeout: err.is_timeout(),
            is_connect: err.is_connect(),
            is_request: err.is_request(),
        }
    }
}

/// One segment of a path into a JSON document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    /// Object key.
    Key(String),
    /// Array index.
    Index(usize),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Key(key) => write!(f, "\"{key}\""),
            Self::Index(index) => write!(f, "{index}"),
        }
    }
}

/// One error item from a well-formed GQL error payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseError {
    /// Human-readable error message reported by the API.
    pub message: String,
    /// Whether this individual error is worth retrying.
    pub recoverable: bool,
}

impl ResponseError {
    /// Create a response error with an explicit recoverability flag.
    #[must_use]
    pub fn new(message: impl Into<String>, recoverable: bool) -> Self {
        Self {
            message: message.into(),
            recoverable,
        }
    }

    /// Classify a raw error message from the API.
    ///
    /// Twitch reports transient backend failures as "service error"; every
    /// other message means the server actively rejected the request.
    #[must_use]
    pub fn from_message(message: impl Into<String>) -> Self {
        let message = message.into();
        let recoverable = matches!(message.as_str(), "service error" | "service unavailable");
        Self {
            message,
            recoverable,
        }
    }
}

/// Error type for GQL client operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GqlError {
    /// Connectivity-level failure: connection refused, timeout, and so on.
    #[error("HTTP error: {}", .0.message)]
    Http(HttpErrorInfo),

    /// The server answered with a non-2xx status.
    #[error("HTTP status {status} with body: {body}")]
    HttpStatus {
        /// HTTP status code.
        status: StatusCode,
        /// Response body, truncated if needed.
        body: String,
    },

    /// The response was well-formed but carried GQL-level errors.
    #[error("GQL operation '{operation_name}' returned errors: {errors:?}")]
    ResponseErrors {
        /// The name of the GQL operation.
        operation_name: String,
        /// The errors in the response.
        errors: Vec<ResponseError>,
    },

    /// The response JSON did not match the expected shape. Likely an API
    /// change on the Twitch side.
    #[error("JSON at [{}] has an invalid shape: {message}", format_path(.path))]
    InvalidShape {
        /// Path to the unexpected value, innermost segment first.
        path: Vec<PathSegment>,
        /// What was wrong with the value.
        message: String,
    },

    /// Every attempt at an operation failed.
    #[error("GQL operation '{operation_name}' failed all {} attempts, errors: {errors:?}", .errors.len())]
    Retry {
        /// The name of the GQL operation.
        operation_name: String,
        /// The errors from every attempt, oldest first.
        errors: Vec<AttemptError<GqlError>>,
    },
}

fn format_path(path: &[PathSegment]) -> String {
    // Paths are accumulated innermost-first, so render them reversed.
    path.iter()
        .rev()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

impl From<reqwest::Error> for GqlError {
    fn from(err: reqwest::Error) -> Self {
        Self::Http(HttpErrorInfo::from(err))
    }
}

impl From<serde_json::Error> for GqlError {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidShape {
            path: Vec::new(),
            message: err.to_string(),
        }
    }
}

impl GqlError {
    /// Returns `true` if this error is transient and worth retrying.
    ///
    /// Transport-class failures are always recoverable; a response-error
    /// payload is recoverable only if every item is; a shape mismatch or an
    /// exhausted retry run never is.
    #[must_use]
    pub fn recoverable(&self) -> bool {
        match self {
            Self::Http(_) | Self::HttpStatus { .. } => true,
            Self::ResponseErrors { errors, .. } => errors.iter().all(|error| error.recoverable),
            Self::InvalidShape { .. } | Self::Retry { .. } => false,
        }
    }

    /// Diagnostic context for the attempt record.
    ///
    /// Domain errors describe themselves; transport failures carry their raw
    /// detail here for postmortem diagnosis.
    #[must_use]
    pub fn diagnostic(&self) -> Option<String> {
        match self {
            Self::Http(info) => Some(format!(
                "{} (timeout: {}, connect: {}, request: {})",
                info.message, info.is_timeout, info.is_connect, info.is_request
            )),
            Self::HttpStatus { status, body } => Some(format!("status {status}: {body}")),
            Self::ResponseErrors { .. } | Self::InvalidShape { .. } | Self::Retry { .. } => None,
        }
    }
}
