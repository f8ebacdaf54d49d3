//! Wire format types for the OpenAI chat completions API.

use serde::{Deserialize, Serialize};

/// Request body for `POST /v1/chat/completions`.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct WireRequest {
    pub model: String,
    pub messages: Vec<WireMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stream_options: Option<WireStreamOptions>,
}

/// Streaming knobs; `include_usage` asks for a trailing usage chunk.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct WireStreamOptions {
    pub include_usage: bool,
}

/// A message in OpenAI wire format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct WireMessage {
    pub role: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<WireToolCall>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
}

/// A tool call in OpenAI wire format. Arguments are a JSON string.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct WireToolCall {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub function: WireToolFunction,
}

/// The function payload of a wire tool call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct WireToolFunction {
    pub name: String,
    pub arguments: String,
}

/// Response body for a non-streaming completion.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct WireResponse {
    pub choices: Vec<WireChoice>,
    #[serde(default)]
    pub usage: Option<WireUsage>,
}

/// One completion choice.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct WireChoice {
    pub message: WireMessage,
}

/// Token accounting block.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct WireUsage {
    #[serde(default)]
    pub prompt_tokens: u64,
    #[serde(default)]
    pub completion_tokens: u64,
    #[serde(default)]
    pub prompt_tokens_details: Option<WirePromptTokensDetails>,
}

/// Cached-token detail inside the usage block.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct WirePromptTokensDetails {
    #[serde(default)]
    pub cached_tokens: u64,
}

/// One server-sent event payload of a streaming completion.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct WireChunk {
    #[serde(default)]
    pub choices: Vec<WireChunkChoice>,
    #[serde(default)]
    pub usage: Option<WireUsage>,
}

/// One choice within a streamed chunk.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct WireChunkChoice {
    pub delta: WireDelta,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// Incremental content of a streamed chunk.
#[derive(Debug, Clone, Deserialize, Default)]
pub(crate) struct WireDelta {
    #[serde(default)]
    pub content: Option<String>,
}
