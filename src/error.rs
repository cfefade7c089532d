//! Error types for the Riot API client.

use thiserror::Error;

/// Broad failure category, used by the dispatcher to decide on retries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Network-level failure, retryable up to the attempt cap
    Transport,
    /// 429 from the server, retryable after the advertised wait
    Throttling,
    /// 5xx from the server, retryable up to the attempt cap
    ServerFault,
    /// 4xx other than 429, never retried
    ClientFault,
    /// Body did not match the expected shape
    DecodeFault,
    /// The call was abandoned before it completed
    Cancelled,
}

/// The specific kind of an [`ApiError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    BadRequest,
    Unauthorized,
    Forbidden,
    NotFound,
    MethodNotAllowed,
    RequestTimeout,
    UnsupportedMediaType,
    RateLimitExceeded,
    InternalServerError,
    BadGateway,
    ServiceUnavailable,
    GatewayTimeout,
    /// A status code with no dedicated kind; the raw status is kept on the error
    Unknown,
    /// DNS failure, refused connection, reset or timeout
    Transport,
    /// The response body could not be decoded into the requested shape
    MalformedResponse,
    /// The configured per-call deadline elapsed
    DeadlineExceeded,
    /// The request could not be turned into a valid URL
    InvalidRequest,
}

impl ErrorKind {
    /// Get the category this kind belongs to.
    pub fn category(&self) -> ErrorCategory {
        match self {
            ErrorKind::Transport => ErrorCategory::Transport,
            ErrorKind::RateLimitExceeded => ErrorCategory::Throttling,
            ErrorKind::InternalServerError
            | ErrorKind::BadGateway
            | ErrorKind::ServiceUnavailable
            | ErrorKind::GatewayTimeout => ErrorCategory::ServerFault,
            ErrorKind::MalformedResponse => ErrorCategory::DecodeFault,
            ErrorKind::DeadlineExceeded => ErrorCategory::Cancelled,
            ErrorKind::BadRequest
            | ErrorKind::Unauthorized
            | ErrorKind::Forbidden
            | ErrorKind::NotFound
            | ErrorKind::MethodNotAllowed
            | ErrorKind::RequestTimeout
            | ErrorKind::UnsupportedMediaType
            | ErrorKind::Unknown
            | ErrorKind::InvalidRequest => ErrorCategory::ClientFault,
        }
    }

    /// Whether the dispatcher may retry a call that failed with this kind.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self.category(),
            ErrorCategory::Transport | ErrorCategory::Throttling | ErrorCategory::ServerFault
        )
    }
}

/// Error returned to callers of the dispatcher and of every endpoint method.
///
/// Callers distinguish failures through [`ApiError::status`] or
/// [`ApiError::kind`], never through the message text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct ApiError {
    message: String,
    status: Option<u16>,
    kind: ErrorKind,
}

impl ApiError {
    /// Create a new error.
    pub fn new(kind: ErrorKind, status: Option<u16>, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status,
            kind,
        }
    }

    /// A network-level failure with no HTTP response.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Transport, None, message)
    }

    /// A successful exchange whose body did not decode.
    pub fn malformed(status: u16, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::MalformedResponse, Some(status), message)
    }

    /// The per-call deadline elapsed.
    pub fn deadline_exceeded() -> Self {
        Self::new(ErrorKind::DeadlineExceeded, None, "deadline exceeded")
    }

    /// Human-readable message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// HTTP status of the response that produced this error, if any.
    pub fn status(&self) -> Option<u16> {
        self.status
    }

    /// Kind of failure, for matching on specific statuses.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Broad category of the failure.
    pub fn category(&self) -> ErrorCategory {
        self.kind.category()
    }
}

/// Look up the error for an HTTP status code.
///
/// Unrecognized codes map to [`ErrorKind::Unknown`] carrying the raw status.
pub fn error_for_status(status: u16) -> ApiError {
    let (kind, message) = match status {
        400 => (ErrorKind::BadRequest, "bad request"),
        401 => (ErrorKind::Unauthorized, "unauthorized"),
        403 => (ErrorKind::Forbidden, "forbidden"),
        404 => (ErrorKind::NotFound, "not found"),
        405 => (ErrorKind::MethodNotAllowed, "method not allowed"),
        408 => (ErrorKind::RequestTimeout, "request timeout"),
        415 => (ErrorKind::UnsupportedMediaType, "unsupported media type"),
        429 => (ErrorKind::RateLimitExceeded, "rate limit exceeded"),
        500 => (ErrorKind::InternalServerError, "internal server error"),
        502 => (ErrorKind::BadGateway, "bad gateway"),
        503 => (ErrorKind::ServiceUnavailable, "service unavailable"),
        504 => (ErrorKind::GatewayTimeout, "gateway timeout"),
        _ => (ErrorKind::Unknown, "unknown error"),
    };
    ApiError::new(kind, Some(status), message)
}

/// Main error type for configuration and client construction.
#[derive(Error, Debug)]
pub enum Error {
    /// A dispatched call failed
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// HTTP client construction errors
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<config::ConfigError> for Error {
    fn from(err: config::ConfigError) -> Self {
        Error::Config(err.to_string())
    }
}

/// Result type alias for client operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_statuses_map_to_kinds() {
        assert_eq!(error_for_status(404).kind(), ErrorKind::NotFound);
        assert_eq!(error_for_status(404).message(), "not found");
        assert_eq!(error_for_status(415).kind(), ErrorKind::UnsupportedMediaType);
        assert_eq!(error_for_status(429).kind(), ErrorKind::RateLimitExceeded);
        assert_eq!(error_for_status(504).kind(), ErrorKind::GatewayTimeout);
    }

    #[test]
    fn test_unknown_status_keeps_raw_code() {
        let err = error_for_status(418);
        assert_eq!(err.kind(), ErrorKind::Unknown);
        assert_eq!(err.status(), Some(418));
        assert_eq!(err.to_string(), "unknown error");
    }

    #[test]
    fn test_categories() {
        assert_eq!(ErrorKind::Transport.category(), ErrorCategory::Transport);
        assert_eq!(ErrorKind::RateLimitExceeded.category(), ErrorCategory::Throttling);
        assert_eq!(ErrorKind::BadGateway.category(), ErrorCategory::ServerFault);
        assert_eq!(ErrorKind::Forbidden.category(), ErrorCategory::ClientFault);
        assert_eq!(ErrorKind::MalformedResponse.category(), ErrorCategory::DecodeFault);
    }

    #[test]
    fn test_retryable_kinds() {
        assert!(ErrorKind::ServiceUnavailable.is_retryable());
        assert!(ErrorKind::RateLimitExceeded.is_retryable());
        assert!(ErrorKind::Transport.is_retryable());
        assert!(!ErrorKind::NotFound.is_retryable());
        assert!(!ErrorKind::MalformedResponse.is_retryable());
        assert!(!ErrorKind::Unknown.is_retryable());
    }
}
