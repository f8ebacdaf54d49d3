//! Core data types for the Vasari chat completion router.
//!
//! This crate provides the foundation data types used across all Vasari interfaces.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod balance;
mod cost;
mod message;
mod request;
mod retry;
mod role;
mod usage;

pub use balance::LoadBalancingMode;
pub use cost::{CostTable, CostTableBuilder};
pub use message::{ChatMessage, ChatMessageBuilder, ToolCall};
pub use request::{ChatRequest, ChatRequestBuilder, ChatResponse};
pub use retry::RetryPolicy;
pub use role::Role;
pub use usage::TokenUsage;
