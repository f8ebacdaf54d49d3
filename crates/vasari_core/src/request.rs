//! Request and response types for chat completion.

use crate::{ChatMessage, TokenUsage};
use serde::{Deserialize, Serialize};

/// A chat completion request, independent of any one provider's wire format.
///
/// # Examples
///
/// ```
/// use vasari_core::{ChatRequest, ChatMessage};
///
/// let request = ChatRequest {
///     messages: vec![ChatMessage::user("Hello!")],
///     max_tokens: Some(100),
///     temperature: Some(0.7),
///     model: None,
/// };
///
/// assert_eq!(request.messages.len(), 1);
/// assert_eq!(request.max_tokens, Some(100));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default, derive_builder::Builder)]
pub struct ChatRequest {
    /// The conversation messages to send
    pub messages: Vec<ChatMessage>,
    /// Maximum number of tokens to generate
    #[builder(default)]
    pub max_tokens: Option<u32>,
    /// Sampling temperature (0.0 to 1.0)
    #[builder(default)]
    pub temperature: Option<f32>,
    /// Model identifier override; backends fall back to their configured model
    #[builder(default)]
    pub model: Option<String>,
}

impl ChatRequest {
    /// Creates a request from a list of messages.
    pub fn new(messages: Vec<ChatMessage>) -> Self {
        Self {
            messages,
            ..Default::default()
        }
    }

    /// Returns a builder for constructing a request field by field.
    pub fn builder() -> ChatRequestBuilder {
        ChatRequestBuilder::default()
    }
}

/// The unified response object with token accounting.
///
/// # Examples
///
/// ```
/// use vasari_core::{ChatResponse, ChatMessage, TokenUsage};
///
/// let response = ChatResponse {
///     message: ChatMessage::assistant("Hello! How can I help?"),
///     usage: TokenUsage::default(),
/// };
///
/// assert!(!response.message.content.is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatResponse {
    /// The generated assistant message
    pub message: ChatMessage,
    /// Token usage reported by the backend
    pub usage: TokenUsage,
}
