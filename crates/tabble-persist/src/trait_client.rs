use async_trait::async_trait;

use crate::error::Result;
use crate::models::{
    MessageCreateRequest, MessageCreateUpdateResponse, MessageResponse, ThreadCreateRequest,
    ThreadCreateUpdateResponse, ThreadResponse, ThreadUpdateRequest,
};

/// Backing store for threads and messages
///
/// Mirrors the remote REST API one call per endpoint. The store gives no
/// transactional guarantees: concurrent updates to the same thread are
/// last-write-wins.
#[async_trait]
pub trait PersistenceClient: Send + Sync {
    /// `POST /api/thread`
    async fn create_thread(&self, request: ThreadCreateRequest) -> Result<ThreadCreateUpdateResponse>;

    /// `PUT /api/thread`
    async fn update_thread(&self, request: ThreadUpdateRequest) -> Result<ThreadCreateUpdateResponse>;

    /// `GET /api/threads`
    async fn list_threads(&self) -> Result<Vec<ThreadResponse>>;

    /// `POST /api/message`
    async fn create_message(&self, request: MessageCreateRequest) -> Result<MessageCreateUpdateResponse>;

    /// `GET /api/messages?thread_id=...`, in insertion order
    async fn list_messages(&self, thread_id: &str) -> Result<Vec<MessageResponse>>;
}
