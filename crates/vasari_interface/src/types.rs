//! Core type definitions for the Vasari interface.

use serde::{Deserialize, Serialize};
use vasari_core::{TokenUsage, ToolCall};
use vasari_error::{BuilderError, VasariErrorKind};

/// A single chunk from a streaming response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default, derive_builder::Builder)]
pub struct StreamChunk {
    /// Incremental text content (may be empty on bookkeeping chunks).
    #[builder(default)]
    pub delta: String,
    /// Tool calls surfaced on this chunk, if any.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    #[builder(default)]
    pub tool_calls: Vec<ToolCall>,
    /// Token usage, reported by backends on the finishing chunk when available.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[builder(default)]
    pub usage: Option<TokenUsage>,
    /// Finish reason if the backend signaled completion on this chunk.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[builder(default)]
    pub finish_reason: Option<FinishReason>,
}

impl StreamChunk {
    /// Returns a builder for constructing a chunk field by field.
    pub fn builder() -> StreamChunkBuilder {
        StreamChunkBuilder::default()
    }

    /// Whether the backend explicitly signaled completion on this chunk.
    pub fn is_final(&self) -> bool {
        self.finish_reason.is_some()
    }
}

impl From<StreamChunkBuilderError> for VasariErrorKind {
    fn from(err: StreamChunkBuilderError) -> Self {
        VasariErrorKind::Builder(BuilderError::new(err.to_string()))
    }
}

/// Why generation stopped.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    strum::EnumIter,
    strum::Display,
)]
pub enum FinishReason {
    /// Model completed naturally.
    Stop,
    /// Hit max_tokens limit.
    Length,
    /// Hit a stop sequence.
    StopSequence,
    /// Model requested tool/function call.
    ToolUse,
    /// Content was filtered.
    ContentFilter,
    /// Other/unknown reason.
    Other,
}
