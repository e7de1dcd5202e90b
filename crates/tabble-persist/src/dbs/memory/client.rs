use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;

use crate::error::{ApiError, Result};
use crate::models::{
    MessageCreateRequest, MessageCreateUpdateResponse, MessageResponse, ThreadCreateRequest,
    ThreadCreateUpdateResponse, ThreadResponse, ThreadUpdateRequest,
};
use crate::trait_client::PersistenceClient;

#[derive(Default)]
struct Store {
    threads: Vec<ThreadResponse>,
    messages: Vec<MessageResponse>,
    next_id: u64,
}

impl Store {
    fn next_id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{}_{}", prefix, self.next_id)
    }

    fn thread_mut(&mut self, ui_thread_id: &str) -> Result<&mut ThreadResponse> {
        self.threads
            .iter_mut()
            .find(|t| t.ui_thread_id == ui_thread_id)
            .ok_or_else(|| ApiError::ThreadNotFound(ui_thread_id.to_string()))
    }
}

/// Process-local store with the same semantics as the REST backend.
///
/// Used for tests and offline sessions.
#[derive(Default)]
pub struct InMemoryPersistenceClient {
    store: Mutex<Store>,
}

impl InMemoryPersistenceClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of persisted messages across all threads
    pub async fn message_count(&self) -> usize {
        self.store.lock().await.messages.len()
    }
}

#[async_trait]
impl PersistenceClient for InMemoryPersistenceClient {
    async fn create_thread(&self, request: ThreadCreateRequest) -> Result<ThreadCreateUpdateResponse> {
        let mut store = self.store.lock().await;

        if store.threads.iter().any(|t| t.ui_thread_id == request.ui_thread_id) {
            return Err(ApiError::ThreadExists(request.ui_thread_id));
        }

        let id = store.next_id("thread");
        let now = Utc::now().to_rfc3339();
        store.threads.push(ThreadResponse {
            id: id.clone(),
            ui_thread_id: request.ui_thread_id.clone(),
            user_id: request.user_id,
            title: request.title,
            archived: false,
            created_at: now.clone(),
            updated_at: now,
        });

        Ok(ThreadCreateUpdateResponse {
            id,
            ui_thread_id: request.ui_thread_id,
        })
    }

    async fn update_thread(&self, request: ThreadUpdateRequest) -> Result<ThreadCreateUpdateResponse> {
        let mut store = self.store.lock().await;
        let thread = store.thread_mut(&request.ui_thread_id)?;

        if let Some(title) = request.title {
            if thread.title.as_deref() != Some(title.as_str()) {
                thread.title = Some(title);
            }
        }
        if let Some(archived) = request.archived {
            thread.archived = archived;
        }
        thread.updated_at = Utc::now().to_rfc3339();

        Ok(ThreadCreateUpdateResponse {
            id: thread.id.clone(),
            ui_thread_id: thread.ui_thread_id.clone(),
        })
    }

    async fn list_threads(&self) -> Result<Vec<ThreadResponse>> {
        Ok(self.store.lock().await.threads.clone())
    }

    async fn create_message(&self, request: MessageCreateRequest) -> Result<MessageCreateUpdateResponse> {
        let mut store = self.store.lock().await;
        store.thread_mut(&request.thread_id)?;

        let id = store.next_id("message");
        store.messages.push(MessageResponse {
            id: request.ui_message_id.clone(),
            thread_id: request.thread_id,
            role: request.role,
            content: request.content,
            created_at: Utc::now().to_rfc3339(),
            updated_at: None,
        });

        Ok(MessageCreateUpdateResponse {
            id,
            ui_message_id: request.ui_message_id,
        })
    }

    async fn list_messages(&self, thread_id: &str) -> Result<Vec<MessageResponse>> {
        let store = self.store.lock().await;
        Ok(store
            .messages
            .iter()
            .filter(|m| m.thread_id == thread_id)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create(id: &str) -> ThreadCreateRequest {
        ThreadCreateRequest {
            ui_thread_id: id.to_string(),
            user_id: None,
            title: Some("New Chat".to_string()),
        }
    }

    #[tokio::test]
    async fn test_one_record_per_remote_id() {
        let client = InMemoryPersistenceClient::new();
        client.create_thread(create("t1")).await.unwrap();

        let err = client.create_thread(create("t1")).await.unwrap_err();
        assert!(matches!(err, ApiError::ThreadExists(_)));
        assert_eq!(client.list_threads().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_update_unknown_thread() {
        let client = InMemoryPersistenceClient::new();
        let err = client
            .update_thread(ThreadUpdateRequest::archived("missing", true))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_partial_update_keeps_other_fields() {
        let client = InMemoryPersistenceClient::new();
        client.create_thread(create("t1")).await.unwrap();

        client.update_thread(ThreadUpdateRequest::archived("t1", true)).await.unwrap();

        let threads = client.list_threads().await.unwrap();
        assert!(threads[0].archived);
        assert_eq!(threads[0].title.as_deref(), Some("New Chat"));
    }
}
