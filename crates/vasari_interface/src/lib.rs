//! Trait definitions for the Vasari chat completion router.
//!
//! This crate provides the seams between the router and its collaborators:
//! backend drivers, name resolvers, the fault classifier, and the
//! tool-call deduplicator.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod traits;
mod types;

pub use traits::{
    ChatBackend, ChunkStream, CostTableResolver, DriverResolver, FaultClassifier, Streaming,
    ToolCallDedup, VasariDriver,
};
pub use types::{FinishReason, StreamChunk, StreamChunkBuilder};
