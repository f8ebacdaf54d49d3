//! Router (failover orchestration) error types.

/// Router-specific error conditions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum RouterErrorKind {
    /// Backend name could not be resolved to a live client
    #[display("Unknown backend: {}", _0)]
    UnknownBackend(String),
    /// No backend pools and no direct backend are configured
    #[display("No backends configured")]
    NoBackendsConfigured,
    /// Every attempt across every phase failed
    #[display("All {} attempts failed, last error: {}", attempts, last_error)]
    AllAttemptsFailed {
        /// Total number of attempts issued
        attempts: u32,
        /// Message of the last observed failure
        last_error: String,
    },
}

/// Router error with source location tracking.
///
/// # Examples
///
/// ```
/// use vasari_error::{RouterError, RouterErrorKind};
///
/// let err = RouterError::new(RouterErrorKind::UnknownBackend("gpt-x".to_string()));
/// assert!(format!("{}", err).contains("Unknown backend"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Router Error: {} at line {} in {}", kind, line, file)]
pub struct RouterError {
    /// The kind of error that occurred
    pub kind: RouterErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl RouterError {
    /// Create a new RouterError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: RouterErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
