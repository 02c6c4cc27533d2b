use thiserror::Error;

use crate::types::FailureReason;

/// Result type alias for lookup operations
pub type Result<T> = std::result::Result<T, LookupError>;

/// Errors that can occur when talking to a lookup service
#[derive(Error, Debug)]
pub enum LookupError {
    /// The service answered HTTP 429
    #[error("rate limit exceeded, retry after {retry_after:?} seconds")]
    RateLimited {
        /// Seconds to wait before retrying, when the service says so
        retry_after: Option<u64>,
    },

    /// Credential rejected by the paid service
    #[error("authentication failed: invalid API token")]
    Unauthorized,

    /// Resource not found
    #[error("resource not found: {resource}")]
    NotFound {
        /// Description of the resource that wasn't found
        resource: String,
    },

    /// Service returned an unexpected HTTP status
    #[error("API error ({code}): {message}")]
    Api {
        /// HTTP status code
        code: u16,
        /// Error message from the service
        message: String,
    },

    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// Request timed out
    #[error("request timed out after {0} seconds")]
    Timeout(u64),

    /// Connection failed
    #[error("connection failed: {0}")]
    Connection(String),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Response parsed but did not have the expected shape
    #[error("malformed response: {0}")]
    Malformed(String),

    /// Service answered with an explicit failure status (e.g. reserved range)
    #[error("service rejected lookup: {0}")]
    ServiceRejected(String),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),
}

impl LookupError {
    /// Returns true if the error is a rate-limit signal
    #[must_use]
    pub const fn is_rate_limited(&self) -> bool {
        matches!(self, Self::RateLimited { .. })
    }

    /// Returns the HTTP status code if this is an API error
    #[must_use]
    pub const fn status_code(&self) -> Option<u16> {
        match self {
            Self::Unauthorized => Some(401),
            Self::RateLimited { .. } => Some(429),
            Self::NotFound { .. } => Some(404),
            Self::Api { code, .. } => Some(*code),
            _ => None,
        }
    }

    /// Category recorded on a definitive-failure result.
    #[must_use]
    pub const fn failure_reason(&self) -> FailureReason {
        match self {
            Self::Timeout(_) => FailureReason::Timeout,
            Self::Http(_) | Self::Connection(_) => FailureReason::Network,
            Self::Json(_) | Self::Malformed(_) => FailureReason::Malformed,
            Self::ServiceRejected(_) => FailureReason::ServiceRejected,
            Self::Unauthorized => FailureReason::Unauthorized,
            Self::RateLimited { .. } => FailureReason::Http(429),
            Self::NotFound { .. } => FailureReason::Http(404),
            Self::Api { code, .. } => FailureReason::Http(*code),
            Self::Config(_) => FailureReason::Internal,
        }
    }
}
