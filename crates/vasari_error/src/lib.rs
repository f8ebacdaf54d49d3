//! Error types for the Vasari library.
//!
//! This crate provides the foundation error types used throughout the Vasari ecosystem.
//!
//! # Error Hierarchy
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern for clean error handling:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - All errors use `#[track_caller]` for automatic location capture
//!
//! # Examples
//!
//! ```
//! use vasari_error::{VasariResult, BackendError, BackendErrorKind};
//!
//! fn call_backend() -> VasariResult<String> {
//!     Err(BackendError::new(BackendErrorKind::Http("Connection refused".to_string())))?
//! }
//!
//! match call_backend() {
//!     Ok(data) => println!("Got: {}", data),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod backend;
mod builder;
mod config;
mod error;
mod router;

pub use backend::{BackendError, BackendErrorKind};
pub use builder::BuilderError;
pub use config::ConfigError;
pub use error::{VasariError, VasariErrorKind, VasariResult};
pub use router::{RouterError, RouterErrorKind};
