//! Router configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use vasari_core::{LoadBalancingMode, RetryPolicy};
use vasari_error::{BuilderError, ConfigError, VasariErrorKind};

/// Configuration for a [`crate::ChatRouter`].
///
/// Created once per router and immutable for its lifetime.
///
/// # Examples
///
/// ```
/// use vasari_router::RouterConfig;
/// use vasari_core::LoadBalancingMode;
///
/// let config = RouterConfig {
///     backends: vec!["groq".to_string(), "openai".to_string()],
///     load_balancing: LoadBalancingMode::RoundRobin,
///     ..Default::default()
/// };
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, derive_builder::Builder)]
pub struct RouterConfig {
    /// Primary pool of backend names, load balanced per `load_balancing`
    #[serde(default)]
    #[builder(default)]
    pub backends: Vec<String>,
    /// Fallback pool, used only after the primary pool is exhausted
    #[serde(default)]
    #[builder(default)]
    pub fallback_backends: Vec<String>,
    /// Ordering strategy for the primary pool
    #[serde(default)]
    #[builder(default)]
    pub load_balancing: LoadBalancingMode,
    /// Ordering strategy for the fallback pool
    #[serde(default)]
    #[builder(default)]
    pub fallback_balancing: LoadBalancingMode,
    /// Attempts per backend before escalating, including the first
    #[serde(default = "default_max_attempts")]
    #[builder(default = "default_max_attempts()")]
    pub max_attempts_per_backend: u32,
    /// Base backoff delay in milliseconds; doubles per retry attempt
    #[serde(default = "default_base_delay_ms")]
    #[builder(default = "default_base_delay_ms()")]
    pub base_delay_ms: u64,
}

impl From<RouterConfigBuilderError> for VasariErrorKind {
    fn from(err: RouterConfigBuilderError) -> Self {
        VasariErrorKind::Builder(BuilderError::new(err.to_string()))
    }
}

fn default_max_attempts() -> u32 {
    3
}

fn default_base_delay_ms() -> u64 {
    500
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            backends: Vec::new(),
            fallback_backends: Vec::new(),
            load_balancing: LoadBalancingMode::default(),
            fallback_balancing: LoadBalancingMode::default(),
            max_attempts_per_backend: default_max_attempts(),
            base_delay_ms: default_base_delay_ms(),
        }
    }
}

impl RouterConfig {
    /// Returns a builder for constructing a config field by field.
    pub fn builder() -> RouterConfigBuilder {
        RouterConfigBuilder::default()
    }

    /// The retry policy derived from this configuration.
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.max_attempts_per_backend,
            Duration::from_millis(self.base_delay_ms),
        )
    }

    /// Validates invariants that serde defaults cannot enforce.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_attempts_per_backend == 0 {
            return Err(ConfigError::new(
                "max_attempts_per_backend must be at least 1",
            ));
        }
        Ok(())
    }
}
