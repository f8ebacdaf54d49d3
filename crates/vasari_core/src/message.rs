//! Message types for conversation history.

use crate::Role;
use serde::{Deserialize, Serialize};

/// A single message in a conversation.
///
/// # Examples
///
/// ```
/// use vasari_core::{ChatMessage, Role};
///
/// let message = ChatMessage::user("Hello!");
/// assert_eq!(message.role, Role::User);
/// assert_eq!(message.content, "Hello!");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, derive_builder::Builder)]
pub struct ChatMessage {
    /// The role of the message sender
    pub role: Role,
    /// The text content of the message
    pub content: String,
    /// Tool calls requested by the model, if any
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    #[builder(default)]
    pub tool_calls: Vec<ToolCall>,
    /// For `Role::Tool` messages, the id of the call being answered
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[builder(default)]
    pub tool_call_id: Option<String>,
}

impl ChatMessage {
    /// Creates a new message with the given role and text content.
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            tool_calls: Vec::new(),
            tool_call_id: None,
        }
    }

    /// Creates a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    /// Creates an assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    /// Creates a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }
}

/// A tool/function call made by the model.
///
/// This is returned in an assistant message when the model decides to
/// use a tool rather than (or in addition to) generating text.
///
/// # Examples
///
/// ```
/// use vasari_core::ToolCall;
/// use serde_json::json;
///
/// let call = ToolCall {
///     id: "call_123".to_string(),
///     name: "get_weather".to_string(),
///     arguments: json!({"location": "San Francisco"}),
/// };
///
/// assert_eq!(call.name, "get_weather");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ToolCall {
    /// Unique identifier for this tool call
    pub id: String,
    /// Name of the tool/function to call
    pub name: String,
    /// Arguments to pass to the tool (as JSON)
    pub arguments: serde_json::Value,
}
