//! Conversions between Vasari types and the OpenAI wire format.

use super::dto::{
    WireMessage, WireRequest, WireResponse, WireStreamOptions, WireToolCall, WireToolFunction,
    WireUsage,
};
use vasari_core::{ChatMessage, ChatRequest, ChatResponse, Role, TokenUsage, ToolCall};
use vasari_error::{BackendError, BackendErrorKind};
use vasari_interface::FinishReason;

pub(crate) fn to_wire_request(req: &ChatRequest, default_model: &str, stream: bool) -> WireRequest {
    WireRequest {
        model: req
            .model
            .clone()
            .unwrap_or_else(|| default_model.to_string()),
        messages: req.messages.iter().map(to_wire_message).collect(),
        max_tokens: req.max_tokens,
        temperature: req.temperature,
        stream,
        stream_options: stream.then_some(WireStreamOptions {
            include_usage: true,
        }),
    }
}

fn to_wire_message(msg: &ChatMessage) -> WireMessage {
    let role = match msg.role {
        Role::System => "system",
        Role::User => "user",
        Role::Assistant => "assistant",
        Role::Tool => "tool",
    };
    let tool_calls = if msg.tool_calls.is_empty() {
        None
    } else {
        Some(msg.tool_calls.iter().map(to_wire_tool_call).collect())
    };
    WireMessage {
        role: role.to_string(),
        content: Some(msg.content.clone()),
        tool_calls,
        tool_call_id: msg.tool_call_id.clone(),
    }
}

fn to_wire_tool_call(call: &ToolCall) -> WireToolCall {
    WireToolCall {
        id: call.id.clone(),
        kind: "function".to_string(),
        function: WireToolFunction {
            name: call.name.clone(),
            // OpenAI transports arguments as a JSON string, not an object.
            arguments: call.arguments.to_string(),
        },
    }
}

pub(crate) fn from_wire_response(response: WireResponse) -> Result<ChatResponse, BackendError> {
    let choice = response.choices.into_iter().next().ok_or_else(|| {
        BackendError::new(BackendErrorKind::Parse(
            "response contained no choices".to_string(),
        ))
    })?;

    Ok(ChatResponse {
        message: from_wire_message(choice.message),
        usage: response.usage.map(from_wire_usage).unwrap_or_default(),
    })
}

pub(crate) fn from_wire_message(msg: WireMessage) -> ChatMessage {
    let role = match msg.role.as_str() {
        "system" => Role::System,
        "tool" => Role::Tool,
        "user" => Role::User,
        _ => Role::Assistant,
    };
    let tool_calls = msg
        .tool_calls
        .unwrap_or_default()
        .into_iter()
        .map(from_wire_tool_call)
        .collect();
    ChatMessage {
        role,
        content: msg.content.unwrap_or_default(),
        tool_calls,
        tool_call_id: msg.tool_call_id,
    }
}

fn from_wire_tool_call(call: WireToolCall) -> ToolCall {
    // Malformed argument strings are preserved verbatim rather than dropped.
    let arguments = serde_json::from_str(&call.function.arguments)
        .unwrap_or(serde_json::Value::String(call.function.arguments));
    ToolCall {
        id: call.id,
        name: call.function.name,
        arguments,
    }
}

pub(crate) fn from_wire_usage(usage: WireUsage) -> TokenUsage {
    TokenUsage {
        input_tokens: usage.prompt_tokens,
        output_tokens: usage.completion_tokens,
        cached_input_tokens: usage
            .prompt_tokens_details
            .map(|d| d.cached_tokens)
            .unwrap_or(0),
    }
}

pub(crate) fn finish_reason(reason: &str) -> FinishReason {
    match reason {
        "stop" => FinishReason::Stop,
        "length" => FinishReason::Length,
        "tool_calls" => FinishReason::ToolUse,
        "content_filter" => FinishReason::ContentFilter,
        _ => FinishReason::Other,
    }
}
