use std::sync::Arc;

use async_trait::async_trait;
use futures::StreamExt;
use tabble_llm::{Role, ThreadMessage};

use super::{ThreadListAdapter, TitleStream};
use crate::error::Result;
use crate::models::{
    InitializeResult, ThreadCreateRequest, ThreadListItem, ThreadUpdateRequest,
    DEFAULT_THREAD_TITLE,
};
use crate::trait_client::PersistenceClient;

/// Characters of the first user message kept in a generated title
pub const TITLE_PREFIX_CHARS: usize = 30;

/// Title for a conversation, from its first user message
pub fn derive_title(messages: &[ThreadMessage]) -> String {
    let first_text = messages
        .first()
        .filter(|message| message.role == Role::User)
        .and_then(ThreadMessage::first_text);

    match first_text {
        Some(text) => {
            let prefix: String = text.chars().take(TITLE_PREFIX_CHARS).collect();
            format!("Chat about {}...", prefix)
        }
        None => DEFAULT_THREAD_TITLE.to_string(),
    }
}

pub struct RemoteThreadList {
    client: Arc<dyn PersistenceClient>,
}

impl RemoteThreadList {
    pub fn new(client: Arc<dyn PersistenceClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ThreadListAdapter for RemoteThreadList {
    async fn list(&self) -> Result<Vec<ThreadListItem>> {
        let threads = self.client.list_threads().await?;
        Ok(threads.into_iter().map(ThreadListItem::from).collect())
    }

    async fn initialize(&self, local_id: &str) -> Result<InitializeResult> {
        let response = self
            .client
            .create_thread(ThreadCreateRequest {
                ui_thread_id: local_id.to_string(),
                user_id: None,
                title: Some(DEFAULT_THREAD_TITLE.to_string()),
            })
            .await?;

        tracing::info!(thread_id = %response.ui_thread_id, "Thread initialized");

        Ok(InitializeResult {
            remote_id: response.ui_thread_id.clone(),
            external_id: response.ui_thread_id,
        })
    }

    async fn rename(&self, remote_id: &str, title: &str) -> Result<()> {
        self.client
            .update_thread(ThreadUpdateRequest::title(remote_id, title))
            .await?;
        Ok(())
    }

    async fn archive(&self, remote_id: &str) -> Result<()> {
        self.client
            .update_thread(ThreadUpdateRequest::archived(remote_id, true))
            .await?;
        Ok(())
    }

    async fn unarchive(&self, remote_id: &str) -> Result<()> {
        self.client
            .update_thread(ThreadUpdateRequest::archived(remote_id, false))
            .await?;
        Ok(())
    }

    async fn delete(&self, remote_id: &str) -> Result<()> {
        tracing::info!(thread_id = %remote_id, "Store has no hard delete, archiving thread instead");
        self.archive(remote_id).await
    }

    async fn generate_title(&self, remote_id: &str, messages: &[ThreadMessage]) -> Result<TitleStream> {
        let title = derive_title(messages);
        tracing::debug!(thread_id = %remote_id, title = %title, "Generated thread title");

        self.rename(remote_id, &title).await?;

        Ok(futures::stream::empty().boxed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tabble_llm::ContentPart;

    #[test]
    fn test_title_defaults_for_empty_history() {
        assert_eq!(derive_title(&[]), "New Chat");
    }

    #[test]
    fn test_title_from_first_user_text() {
        let messages = vec![ThreadMessage::user("Sum column B")];
        assert_eq!(derive_title(&messages), "Chat about Sum column B...");
    }

    #[test]
    fn test_title_is_truncated_by_characters() {
        let long = "ü".repeat(40);
        let title = derive_title(&[ThreadMessage::user(long)]);
        assert_eq!(title, format!("Chat about {}...", "ü".repeat(30)));
    }

    #[test]
    fn test_title_skips_non_text_parts() {
        let message = ThreadMessage::new(
            Role::User,
            vec![
                tabble_llm::ToolCallPart::new("c", "t", serde_json::json!({})).into(),
                ContentPart::text("hello"),
            ],
        );
        assert_eq!(derive_title(&[message]), "Chat about hello...");
    }

    #[test]
    fn test_title_requires_user_first_message() {
        let messages = vec![ThreadMessage::assistant(vec![ContentPart::text("hi")])];
        assert_eq!(derive_title(&messages), "New Chat");
    }
}
