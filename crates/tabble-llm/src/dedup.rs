//! Collapses repeated partial tool-call entries before a conversation is
//! replayed to the model.
//!
//! For every `toolCallId` only the first and the last entry survive; the
//! interior entries are intermediate argument deltas and carry no extra
//! context. Output layout is `[tool calls, first-seen order] ++ [everything
//! else, original order]`.

use std::collections::HashMap;

use crate::types::{ContentPart, ThreadMessage, ToolCallPart};

/// Deduplicate the tool calls of one content array
pub fn dedupe_tool_calls(content: Vec<ContentPart>) -> Vec<ContentPart> {
    let mut groups: Vec<Vec<ToolCallPart>> = Vec::new();
    let mut group_index: HashMap<String, usize> = HashMap::new();
    let mut other_content = Vec::new();

    for part in content {
        match part {
            ContentPart::ToolCall(call) => {
                let idx = *group_index
                    .entry(call.tool_call_id.clone())
                    .or_insert_with(|| {
                        groups.push(Vec::new());
                        groups.len() - 1
                    });
                groups[idx].push(call);
            }
            other => other_content.push(other),
        }
    }

    let mut deduped = Vec::with_capacity(groups.len() * 2 + other_content.len());
    for calls in groups {
        let count = calls.len();
        let mut calls = calls.into_iter();
        if let Some(first) = calls.next() {
            deduped.push(ContentPart::ToolCall(first));
        }
        if count > 1 {
            if let Some(last) = calls.last() {
                deduped.push(ContentPart::ToolCall(last));
            }
        }
    }
    deduped.extend(other_content);
    deduped
}

/// Deduplicate a single message, keeping its identity
pub fn dedupe_message(message: ThreadMessage) -> ThreadMessage {
    ThreadMessage {
        content: dedupe_tool_calls(message.content),
        ..message
    }
}

/// Deduplicate every message of a history, preserving message order
pub fn dedupe_history(messages: Vec<ThreadMessage>) -> Vec<ThreadMessage> {
    messages.into_iter().map(dedupe_message).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn call(id: &str, args: serde_json::Value) -> ContentPart {
        ContentPart::ToolCall(ToolCallPart::new(id, "search", args))
    }

    #[test]
    fn test_single_call_is_kept() {
        let content = vec![call("a", json!({"q": "x"}))];
        assert_eq!(dedupe_tool_calls(content.clone()), content);
    }

    #[test]
    fn test_keeps_first_and_last_of_each_id() {
        let content = vec![
            call("a", json!({"q": ""})),
            call("a", json!({"q": "r"})),
            call("a", json!({"q": "ru"})),
            call("a", json!({"q": "rust"})),
        ];

        let deduped = dedupe_tool_calls(content);

        assert_eq!(
            deduped,
            vec![call("a", json!({"q": ""})), call("a", json!({"q": "rust"}))]
        );
    }

    #[test]
    fn test_tool_calls_move_before_other_content() {
        let content = vec![
            ContentPart::text("first"),
            call("a", json!(1)),
            ContentPart::text("second"),
            call("b", json!(1)),
            call("a", json!(2)),
            ContentPart::text("third"),
            call("a", json!(3)),
        ];

        let deduped = dedupe_tool_calls(content);

        assert_eq!(
            deduped,
            vec![
                call("a", json!(1)),
                call("a", json!(3)),
                call("b", json!(1)),
                ContentPart::text("first"),
                ContentPart::text("second"),
                ContentPart::text("third"),
            ]
        );
    }

    #[test]
    fn test_no_tool_calls_is_identity() {
        let content = vec![ContentPart::text("a"), ContentPart::text("b")];
        assert_eq!(dedupe_tool_calls(content.clone()), content);
    }

    #[test]
    fn test_dedupe_history_keeps_message_ids() {
        let message = ThreadMessage::assistant(vec![call("a", json!(1)), call("a", json!(2)), call("a", json!(3))])
            .with_id("m1");

        let history = dedupe_history(vec![ThreadMessage::user("hi").with_id("m0"), message]);

        assert_eq!(history.len(), 2);
        assert_eq!(history[0].id, "m0");
        assert_eq!(history[1].id, "m1");
        assert_eq!(history[1].content.len(), 2);
    }
}
