use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tabble_llm::{ContentPart, StreamEvent, ThreadMessage, ToolCallPart};

/// Renderable content of an in-flight turn.
///
/// Not persisted; rebuilt from scratch for every turn.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TurnSnapshot {
    pub tool_calls: Vec<ToolCallPart>,
    pub text: String,
}

impl TurnSnapshot {
    /// Tool calls in first-seen order, then the text as a single part
    /// (omitted while empty)
    pub fn content(&self) -> Vec<ContentPart> {
        let mut content: Vec<ContentPart> = self
            .tool_calls
            .iter()
            .cloned()
            .map(ContentPart::ToolCall)
            .collect();
        if !self.text.is_empty() {
            content.push(ContentPart::text(self.text.clone()));
        }
        content
    }

    pub fn is_empty(&self) -> bool {
        self.tool_calls.is_empty() && self.text.is_empty()
    }

    /// Final assistant message for this turn
    pub fn to_message(&self) -> ThreadMessage {
        ThreadMessage::assistant(self.content())
    }
}

/// Folds the decoded frames of one turn into a growing [`TurnSnapshot`].
///
/// Text is only ever appended. Each distinct `toolCallId` owns one slot,
/// created on first sight and overwritten in place afterwards, so the slot
/// count never shrinks.
#[derive(Debug, Default)]
pub struct TurnAccumulator {
    snapshot: TurnSnapshot,
    slots: HashMap<String, usize>,
    frames_seen: usize,
}

impl TurnAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one frame and return the updated snapshot
    pub fn push(&mut self, event: StreamEvent) -> &TurnSnapshot {
        self.frames_seen += 1;

        match event {
            StreamEvent::Text { text } => {
                self.snapshot.text.push_str(&text);
            }
            StreamEvent::ToolCall { tool_call_id, tool_name, args } => {
                match self.slots.get(&tool_call_id) {
                    Some(&slot) => {
                        let entry = &mut self.snapshot.tool_calls[slot];
                        entry.tool_name = tool_name;
                        entry.args = args;
                    }
                    None => {
                        self.slots
                            .insert(tool_call_id.clone(), self.snapshot.tool_calls.len());
                        self.snapshot
                            .tool_calls
                            .push(ToolCallPart::new(tool_call_id, tool_name, args));
                    }
                }
            }
        }

        &self.snapshot
    }

    pub fn snapshot(&self) -> &TurnSnapshot {
        &self.snapshot
    }

    pub fn into_snapshot(self) -> TurnSnapshot {
        self.snapshot
    }

    pub fn frames_seen(&self) -> usize {
        self.frames_seen
    }
}
