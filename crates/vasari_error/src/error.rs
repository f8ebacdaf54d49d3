//! Top-level error wrapper types.

use crate::{BackendError, BuilderError, ConfigError, RouterError};

/// This is the foundation error enum. Each layer of the workspace
/// contributes its own variant.
///
/// # Examples
///
/// ```
/// use vasari_error::{VasariError, ConfigError};
///
/// let cfg_err = ConfigError::new("pool is empty");
/// let err: VasariError = cfg_err.into();
/// assert!(format!("{}", err).contains("Configuration Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum VasariErrorKind {
    /// Remote backend error
    #[from(BackendError)]
    Backend(BackendError),
    /// Router orchestration error
    #[from(RouterError)]
    Router(RouterError),
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// Builder error
    #[from(BuilderError)]
    Builder(BuilderError),
}

/// Vasari error with kind discrimination.
///
/// # Examples
///
/// ```
/// use vasari_error::{VasariResult, ConfigError};
///
/// fn might_fail() -> VasariResult<()> {
///     Err(ConfigError::new("Missing field"))?
/// }
///
/// match might_fail() {
///     Ok(_) => println!("Success"),
///     Err(e) => println!("Error: {}", e),
/// }
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Vasari Error: {}", _0)]
pub struct VasariError(Box<VasariErrorKind>);

impl VasariError {
    /// Create a new error from a kind.
    pub fn new(kind: VasariErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &VasariErrorKind {
        &self.0
    }
}

// Generic From implementation for any type that converts to VasariErrorKind
impl<T> From<T> for VasariError
where
    T: Into<VasariErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for Vasari operations.
///
/// # Examples
///
/// ```
/// use vasari_error::{VasariResult, BackendError, BackendErrorKind};
///
/// fn fetch_data() -> VasariResult<String> {
///     Err(BackendError::new(BackendErrorKind::Http("404 Not Found".to_string())))?
/// }
/// ```
pub type VasariResult<T> = std::result::Result<T, VasariError>;
