//! Load balancing modes for backend pools.

use serde::{Deserialize, Serialize};

/// How a pool of backend names is ordered before attempts begin.
///
/// # Examples
///
/// ```
/// use vasari_core::LoadBalancingMode;
/// use std::str::FromStr;
///
/// assert_eq!(
///     LoadBalancingMode::from_str("round_robin").unwrap(),
///     LoadBalancingMode::RoundRobin
/// );
/// assert_eq!(LoadBalancingMode::default(), LoadBalancingMode::Sequential);
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum LoadBalancingMode {
    /// Only the first backend in the pool is used
    Single,
    /// Backends are tried in configured order
    #[default]
    Sequential,
    /// The starting backend rotates across calls
    RoundRobin,
    /// The pool is shuffled per call (Fisher-Yates)
    Random,
}
