//! Token usage accounting.

use serde::{Deserialize, Serialize};

/// Token counts reported by a backend for one request.
///
/// # Examples
///
/// ```
/// use vasari_core::TokenUsage;
///
/// let usage = TokenUsage {
///     input_tokens: 1000,
///     output_tokens: 500,
///     cached_input_tokens: 200,
/// };
///
/// assert_eq!(usage.total(), 1500);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct TokenUsage {
    /// Tokens consumed by the prompt
    pub input_tokens: u64,
    /// Tokens generated in the completion
    pub output_tokens: u64,
    /// Prompt tokens served from the provider's cache (subset of `input_tokens`)
    pub cached_input_tokens: u64,
}

impl TokenUsage {
    /// Total tokens consumed (prompt + completion).
    pub fn total(&self) -> u64 {
        self.input_tokens + self.output_tokens
    }
}
