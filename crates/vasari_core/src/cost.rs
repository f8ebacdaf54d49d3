//! Per-backend pricing tables and cost calculation.

use serde::{Deserialize, Serialize};

/// Per-1000-token pricing for a backend.
///
/// # Examples
///
/// ```
/// use vasari_core::CostTable;
///
/// let table = CostTable {
///     input_per_1k: 0.01,
///     output_per_1k: 0.02,
///     currency: "USD".to_string(),
/// };
///
/// // 1000 input tokens and 2000 output tokens
/// assert!((table.cost(1000, 2000) - 0.05).abs() < f64::EPSILON);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, derive_builder::Builder)]
pub struct CostTable {
    /// Price per 1000 input tokens
    pub input_per_1k: f64,
    /// Price per 1000 output tokens
    pub output_per_1k: f64,
    /// ISO currency code the prices are denominated in
    #[builder(default = "default_currency()")]
    #[serde(default = "default_currency")]
    pub currency: String,
}

fn default_currency() -> String {
    "USD".to_string()
}

impl CostTable {
    /// Compute the monetary cost for the given token counts.
    pub fn cost(&self, input_tokens: u64, output_tokens: u64) -> f64 {
        (input_tokens as f64 / 1000.0) * self.input_per_1k
            + (output_tokens as f64 / 1000.0) * self.output_per_1k
    }
}
