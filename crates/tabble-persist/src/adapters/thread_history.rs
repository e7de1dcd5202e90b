use std::sync::Arc;

use async_trait::async_trait;
use tabble_llm::ThreadMessage;

use super::ThreadHistoryAdapter;
use crate::error::Result;
use crate::models::{chain_messages, HistoryItem, MessageCreateRequest};
use crate::trait_client::PersistenceClient;

/// History adapter scoped to one thread.
///
/// `remote_id` is None until the thread has been initialized; appends are
/// dropped (not queued) in that state so no message is ever written against
/// a thread the store does not know.
pub struct RemoteThreadHistory {
    client: Arc<dyn PersistenceClient>,
    remote_id: Option<String>,
}

impl RemoteThreadHistory {
    pub fn new(client: Arc<dyn PersistenceClient>, remote_id: Option<String>) -> Self {
        Self { client, remote_id }
    }

    pub fn remote_id(&self) -> Option<&str> {
        self.remote_id.as_deref()
    }
}

#[async_trait]
impl ThreadHistoryAdapter for RemoteThreadHistory {
    async fn load(&self) -> Result<Vec<HistoryItem>> {
        let Some(remote_id) = self.remote_id.as_deref() else {
            return Ok(Vec::new());
        };

        let messages = self
            .client
            .list_messages(remote_id)
            .await?
            .into_iter()
            .map(ThreadMessage::try_from)
            .collect::<Result<Vec<_>>>()?;

        tracing::debug!(thread_id = %remote_id, count = messages.len(), "Loaded thread history");

        Ok(chain_messages(messages))
    }

    async fn append(&self, message: &ThreadMessage) -> Result<()> {
        let Some(remote_id) = self.remote_id.as_deref() else {
            tracing::warn!(message_id = %message.id, "Cannot save message - thread not initialized");
            return Ok(());
        };

        self.client
            .create_message(MessageCreateRequest {
                ui_message_id: message.id.clone(),
                thread_id: remote_id.to_string(),
                role: message.role.to_string(),
                content: message.content.clone(),
            })
            .await?;

        tracing::debug!(thread_id = %remote_id, message_id = %message.id, "Message saved");
        Ok(())
    }
}
