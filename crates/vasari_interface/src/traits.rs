//! Trait definitions for chat backends and router collaborators.

use crate::StreamChunk;
use async_trait::async_trait;
use futures_util::stream::Stream;
use std::pin::Pin;
use std::sync::Arc;
use vasari_core::{ChatRequest, ChatResponse, CostTable};
use vasari_error::{VasariError, VasariResult};

/// A pinned, boxed stream of completion chunks.
pub type ChunkStream = Pin<Box<dyn Stream<Item = VasariResult<StreamChunk>> + Send>>;

/// Core trait that all chat backends must implement.
///
/// This provides the minimal interface for blocking chat completion.
/// Streaming is exposed through the [`Streaming`] trait.
#[async_trait]
pub trait VasariDriver: Send + Sync {
    /// Issue a chat completion request and wait for the full response.
    ///
    /// Must raise a fault on failure and report token usage on success
    /// when the provider makes it available.
    async fn complete(&self, req: &ChatRequest) -> VasariResult<ChatResponse>;

    /// Provider name (e.g., "openai", "anthropic", "groq").
    fn provider_name(&self) -> &'static str;

    /// Model identifier (e.g., "gpt-4o-mini").
    fn model_name(&self) -> &str;
}

/// Trait for backends that support streaming responses.
#[async_trait]
pub trait Streaming: VasariDriver {
    /// Issue a streaming chat completion request.
    ///
    /// Returns a stream that yields chunks as they arrive from the API.
    /// The finishing chunk carries the finish reason and token usage when
    /// the provider reports them; providers that close the stream without
    /// an explicit finish signal are tolerated (the router synthesizes
    /// completion).
    async fn complete_stream(&self, req: &ChatRequest) -> VasariResult<ChunkStream>;
}

/// Object-safe union of the capabilities the router requires of a backend.
pub trait ChatBackend: Streaming {}

impl<T: Streaming + ?Sized> ChatBackend for T {}

/// Resolves a backend name to a live client handle.
///
/// Called at most once per name by the router's driver registry; the
/// registry caches the returned handle for its lifetime.
pub trait DriverResolver: Send + Sync {
    /// Resolve `name` to a backend handle, or fail with an
    /// `UnknownBackend`-class error.
    fn resolve(&self, name: &str) -> VasariResult<Arc<dyn ChatBackend>>;
}

/// Resolves a backend name to its pricing table.
///
/// Absence is not an error: backends without pricing report zero cost.
pub trait CostTableResolver: Send + Sync {
    /// Resolve `name` to a pricing table, if one is configured.
    fn resolve(&self, name: &str) -> Option<CostTable>;
}

/// Classifies faults into transient and non-transient.
///
/// Both methods may return false for an unknown fault; the router
/// treats unknown faults as non-transient by policy.
pub trait FaultClassifier: Send + Sync {
    /// Whether the fault is expected to succeed if retried.
    fn is_transient(&self, error: &VasariError) -> bool;

    /// Whether the fault is known to be permanent.
    fn is_non_transient(&self, error: &VasariError) -> bool;
}

/// Removes duplicate tool calls from a completed response.
///
/// Applied exactly once per successful non-streaming result. Must be
/// idempotent.
pub trait ToolCallDedup: Send + Sync {
    /// Return `response` with duplicate tool calls removed.
    fn dedupe(&self, response: ChatResponse) -> ChatResponse;
}
