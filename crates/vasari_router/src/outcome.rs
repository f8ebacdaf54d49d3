//! Result types produced by the router executors.

use vasari_core::ChatMessage;
use vasari_interface::StreamChunk;

/// The result of a non-streaming router call.
///
/// Always produced, even on total exhaustion: in that case `message`
/// carries the last error text so a chat surface can render it in-band,
/// `backend` is empty and no cost accrues.
///
/// # Examples
///
/// ```
/// use vasari_router::CompletionOutcome;
///
/// let outcome = CompletionOutcome::failure("all backends are down");
/// assert!(outcome.is_failure());
/// assert_eq!(outcome.cost, 0.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionOutcome {
    /// The assistant message, or the error text on exhaustion
    pub message: ChatMessage,
    /// Cost of the winning attempt in the backend's currency
    pub cost: f64,
    /// Prompt tokens consumed
    pub input_tokens: u64,
    /// Completion tokens produced
    pub output_tokens: u64,
    /// Prompt tokens served from the provider's cache
    pub cached_input_tokens: u64,
    /// Name of the backend that served the request; empty on failure
    pub backend: String,
}

impl CompletionOutcome {
    /// An exhaustion outcome carrying the last error text in-band.
    pub fn failure(error_text: impl Into<String>) -> Self {
        Self {
            message: ChatMessage::assistant(error_text),
            cost: 0.0,
            input_tokens: 0,
            output_tokens: 0,
            cached_input_tokens: 0,
            backend: String::new(),
        }
    }

    /// Whether this outcome came from exhaustion rather than a backend.
    pub fn is_failure(&self) -> bool {
        self.backend.is_empty()
    }
}

/// One increment of a streaming router call.
///
/// Exactly one update per successful call has `is_complete == true`;
/// cost and token counts are populated only on that update. An update
/// with `is_error == true` is terminal and means every backend failed
/// after partial output had already been forwarded.
#[derive(Debug, Clone, PartialEq)]
pub struct StreamUpdate {
    /// The chunk forwarded from the backend
    pub chunk: StreamChunk,
    /// Cost of the whole attempt; nonzero only when `is_complete`
    pub cost: f64,
    /// Prompt tokens; populated only when `is_complete`
    pub input_tokens: u64,
    /// Completion tokens; populated only when `is_complete`
    pub output_tokens: u64,
    /// Terminal marker for a successful attempt
    pub is_complete: bool,
    /// Name of the backend producing this update
    pub backend: String,
    /// Terminal marker for exhaustion after partial output
    pub is_error: bool,
    /// Last error text, set only when `is_error`
    pub error_message: Option<String>,
}

impl StreamUpdate {
    /// A non-terminal update forwarding `chunk` from `backend`.
    pub fn delta(chunk: StreamChunk, backend: impl Into<String>) -> Self {
        Self {
            chunk,
            cost: 0.0,
            input_tokens: 0,
            output_tokens: 0,
            is_complete: false,
            backend: backend.into(),
            is_error: false,
            error_message: None,
        }
    }

    /// The terminal update of a successful attempt.
    pub fn completion(
        chunk: StreamChunk,
        backend: impl Into<String>,
        cost: f64,
        input_tokens: u64,
        output_tokens: u64,
    ) -> Self {
        Self {
            chunk,
            cost,
            input_tokens,
            output_tokens,
            is_complete: true,
            backend: backend.into(),
            is_error: false,
            error_message: None,
        }
    }

    /// The terminal update after exhaustion with partial output already
    /// forwarded. Not a completion: `is_complete` stays false.
    pub fn exhausted(error_message: impl Into<String>) -> Self {
        Self {
            chunk: StreamChunk::default(),
            cost: 0.0,
            input_tokens: 0,
            output_tokens: 0,
            is_complete: false,
            backend: String::new(),
            is_error: true,
            error_message: Some(error_message.into()),
        }
    }
}
