//! Backend (remote model provider) error types.

/// Backend-specific error conditions.
///
/// Variants map onto the fault taxonomy used by the router: some are
/// transient (worth retrying against the same backend), some are
/// permanent (escalate to the next backend immediately).
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum BackendErrorKind {
    /// API key not found in environment
    #[display("{} environment variable not set", _0)]
    MissingApiKey(String),
    /// Transport-level failure (connection refused, DNS, broken pipe)
    #[display("HTTP transport error: {}", _0)]
    Http(String),
    /// API returned a non-success status code
    #[display("API error {}: {}", status, message)]
    Api {
        /// HTTP status code
        status: u16,
        /// Error message from the response body
        message: String,
    },
    /// Request was rate limited by the provider
    #[display("Rate limited: {}", _0)]
    RateLimited(String),
    /// Request timed out
    #[display("Request timed out: {}", _0)]
    Timeout(String),
    /// Authentication or authorization failure
    #[display("Authentication failed: {}", _0)]
    Auth(String),
    /// Request was malformed or rejected by validation
    #[display("Invalid request: {}", _0)]
    InvalidRequest(String),
    /// Response was blocked by the provider's content policy
    #[display("Content filtered: {}", _0)]
    ContentFiltered(String),
    /// Requested model does not exist on this backend
    #[display("Model not found: {}", _0)]
    ModelNotFound(String),
    /// Failed to parse the provider response
    #[display("Response parse error: {}", _0)]
    Parse(String),
    /// Streaming response was interrupted mid-flight
    #[display("Stream interrupted: {}", _0)]
    Stream(String),
}

impl BackendErrorKind {
    /// Check if this error is transient and worth retrying on the same backend.
    pub fn is_transient(&self) -> bool {
        match self {
            BackendErrorKind::Http(_) => true,
            BackendErrorKind::RateLimited(_) => true,
            BackendErrorKind::Timeout(_) => true,
            BackendErrorKind::Stream(_) => true,
            BackendErrorKind::Api { status, .. } => {
                matches!(*status, 408 | 429 | 500 | 502 | 503 | 504)
            }
            _ => false,
        }
    }

    /// Check if this error is known to be permanent.
    ///
    /// Note that `!is_transient()` is not the same as `is_permanent()`:
    /// unclassified errors are neither, and the router treats them as
    /// permanent by policy.
    pub fn is_permanent(&self) -> bool {
        match self {
            BackendErrorKind::MissingApiKey(_) => true,
            BackendErrorKind::Auth(_) => true,
            BackendErrorKind::InvalidRequest(_) => true,
            BackendErrorKind::ContentFiltered(_) => true,
            BackendErrorKind::ModelNotFound(_) => true,
            BackendErrorKind::Api { status, .. } => matches!(*status, 400..=499) && *status != 408 && *status != 429,
            _ => false,
        }
    }
}

/// Backend error with source location tracking.
///
/// # Examples
///
/// ```
/// use vasari_error::{BackendError, BackendErrorKind};
///
/// let err = BackendError::new(BackendErrorKind::RateLimited("429".to_string()));
/// assert!(format!("{}", err).contains("Rate limited"));
/// assert!(err.kind.is_transient());
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Backend Error: {} at line {} in {}", kind, line, file)]
pub struct BackendError {
    /// The kind of error that occurred
    pub kind: BackendErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl BackendError {
    /// Create a new BackendError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: BackendErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
