//! Capability sets the conversation runtime consumes.
//!
//! Each adapter is a fixed method set over a [`crate::PersistenceClient`];
//! the runtime only ever talks to the store through these two.

mod thread_history;
mod thread_list;

pub use thread_history::RemoteThreadHistory;
pub use thread_list::{derive_title, RemoteThreadList, TITLE_PREFIX_CHARS};

use async_trait::async_trait;
use futures::stream::BoxStream;
use tabble_llm::ThreadMessage;

use crate::error::Result;
use crate::models::{HistoryItem, InitializeResult, ThreadListItem};

/// Incremental title tokens. The store cannot stream titles, so every
/// implementation here returns an already-finished stream.
pub type TitleStream = BoxStream<'static, String>;

#[async_trait]
pub trait ThreadListAdapter: Send + Sync {
    async fn list(&self) -> Result<Vec<ThreadListItem>>;

    /// Register a thread keyed by the caller's local id
    async fn initialize(&self, local_id: &str) -> Result<InitializeResult>;

    async fn rename(&self, remote_id: &str, title: &str) -> Result<()>;

    async fn archive(&self, remote_id: &str) -> Result<()>;

    async fn unarchive(&self, remote_id: &str) -> Result<()>;

    /// Soft delete: the thread is archived, never removed
    async fn delete(&self, remote_id: &str) -> Result<()>;

    async fn generate_title(&self, remote_id: &str, messages: &[ThreadMessage]) -> Result<TitleStream>;
}

/// Message history of a single thread
#[async_trait]
pub trait ThreadHistoryAdapter: Send + Sync {
    /// All messages with their parent pointers, oldest first
    async fn load(&self) -> Result<Vec<HistoryItem>>;

    /// Persist a completed message. A no-op while the thread has no remote id.
    async fn append(&self, message: &ThreadMessage) -> Result<()>;
}
