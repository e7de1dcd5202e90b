use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::dedup::dedupe_history;
use crate::error::Result;
use crate::streaming::ByteStream;
use crate::types::ThreadMessage;

/// Body of a chat request: the conversation so far
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    pub messages: Vec<ThreadMessage>,
}

impl ChatRequest {
    pub fn new(messages: Vec<ThreadMessage>) -> Self {
        Self { messages }
    }

    /// Collapse partial tool-call updates in every message
    pub fn deduplicated(self) -> Self {
        Self {
            messages: dedupe_history(self.messages),
        }
    }
}

/// Transport for one streaming chat turn.
///
/// Implementations return the raw response body; frame decoding is done by
/// the caller with [`crate::decode_frame_stream`]. A non-OK response must be
/// reported as [`crate::ChatError::Transport`] before any byte is yielded.
#[async_trait]
pub trait ChatClient: Send + Sync {
    async fn chat_stream(&self, request: ChatRequest) -> Result<ByteStream>;
}
