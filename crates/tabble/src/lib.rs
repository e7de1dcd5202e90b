//! # Tabble
//!
//! Client runtime for a streaming chat assistant with persisted threads.
//!
//! ## Overview
//!
//! - **Decode** the backend's `\n\n`-delimited JSON frame stream, however
//!   the bytes are chunked
//! - **Accumulate** text and tool-call frames into a growing snapshot
//! - **Cancel** a running turn at any frame boundary
//! - **Persist** threads and messages through a REST store, or in memory
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use tabble::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = RuntimeConfig::load()?;
//!     let session = ChatSession::from_config(&config)?;
//!
//!     let mut thread = session.create_thread().await?;
//!     let outcome = thread
//!         .run_turn(
//!             ThreadMessage::user("Hello!"),
//!             CancellationToken::new(),
//!             |snapshot| println!("{}", snapshot.text),
//!         )
//!         .await;
//!
//!     println!("turn ended: {:?}", outcome.state);
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! - **`tabble-llm`**: message model, frame decoder, tool-call deduplication,
//!   HTTP chat client
//! - **`tabble-persist`**: thread and message store, history and thread-list
//!   adapters, turn accumulator
//! - **`tabble-runtime`**: turn state machine, orchestrator, session
//!   context and configuration

pub mod prelude;

pub use tabble_llm::{
    ChatClient, ChatClientConfig, ChatError, ChatRequest, ContentPart, DecodeError, HttpChatClient,
    Role, StreamEvent, ThreadMessage, ToolCallPart,
    decode_frame, decode_frame_stream, dedupe_history, dedupe_message, dedupe_tool_calls,
};

pub use tabble_persist::{
    ApiError, HistoryItem, HttpPersistenceClient, InMemoryPersistenceClient, InitializeResult,
    PersistClientBuilder, PersistenceClient, RemoteThreadHistory, RemoteThreadList,
    ThreadHistoryAdapter, ThreadListAdapter, ThreadListItem, ThreadStatus, TurnAccumulator,
    TurnSnapshot, DEFAULT_THREAD_TITLE, USER_FACING_MESSAGE,
};

pub use tabble_runtime::{
    ApiConfig, CancellationToken, ChatSession, ChatSessionBuilder, LoggingConfig, RuntimeConfig,
    ThreadRuntime, Turn, TurnConfig, TurnError, TurnHandle, TurnOutcome, TurnRunner, TurnState,
};
