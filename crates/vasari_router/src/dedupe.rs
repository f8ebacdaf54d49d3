//! Tool call deduplication.

use std::collections::HashSet;
use tracing::debug;
use vasari_core::ChatResponse;
use vasari_interface::ToolCallDedup;

/// Drops repeated tool calls from a completed response.
///
/// Models occasionally emit the same call twice in one turn. Two calls
/// are duplicates when both the function name and the full argument
/// payload match; the first occurrence wins and ordering is preserved.
#[derive(Debug, Clone, Copy, Default)]
pub struct DuplicateToolCallFilter;

impl ToolCallDedup for DuplicateToolCallFilter {
    fn dedupe(&self, mut response: ChatResponse) -> ChatResponse {
        if response.message.tool_calls.len() < 2 {
            return response;
        }
        let before = response.message.tool_calls.len();
        let mut seen = HashSet::new();
        response
            .message
            .tool_calls
            .retain(|call| seen.insert((call.name.clone(), call.arguments.to_string())));
        let dropped = before - response.message.tool_calls.len();
        if dropped > 0 {
            debug!(dropped, "Removed duplicate tool calls");
        }
        response
    }
}
