//! Prelude module for convenient imports
//!
//! ```rust
//! use tabble::prelude::*;
//! ```

pub use crate::{
    ChatClient, ChatRequest, ContentPart, HttpChatClient, Role, StreamEvent, ThreadMessage,
    ToolCallPart,
    PersistenceClient, ThreadHistoryAdapter, ThreadListAdapter, TurnSnapshot,
    CancellationToken, ChatSession, RuntimeConfig, ThreadRuntime, TurnOutcome, TurnState,
};
