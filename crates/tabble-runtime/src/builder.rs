use std::sync::Arc;

use tabble_llm::ChatClient;
use tabble_persist::PersistenceClient;

use crate::config::TurnConfig;
use crate::error::{Result, TurnError};
use crate::session::ChatSession;

/// Builder for a [`ChatSession`] with injected transports
pub struct ChatSessionBuilder {
    chat_client: Option<Arc<dyn ChatClient>>,
    store: Option<Arc<dyn PersistenceClient>>,
    turn_config: TurnConfig,
}

impl ChatSessionBuilder {
    pub fn new() -> Self {
        Self {
            chat_client: None,
            store: None,
            turn_config: TurnConfig::default(),
        }
    }

    pub fn chat_client(mut self, client: Arc<dyn ChatClient>) -> Self {
        self.chat_client = Some(client);
        self
    }

    /// Set the thread and message store
    pub fn store(mut self, store: Arc<dyn PersistenceClient>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn turn_config(mut self, config: TurnConfig) -> Self {
        self.turn_config = config;
        self
    }

    pub fn build(self) -> Result<ChatSession> {
        let chat_client = self
            .chat_client
            .ok_or_else(|| TurnError::Config("Chat client is required".to_string()))?;
        let store = self
            .store
            .ok_or_else(|| TurnError::Config("Persistence store is required".to_string()))?;

        Ok(ChatSession::new(chat_client, store, self.turn_config))
    }
}

impl Default for ChatSessionBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tabble_persist::InMemoryPersistenceClient;

    #[test]
    fn test_builder_requires_chat_client() {
        let result = ChatSessionBuilder::new()
            .store(Arc::new(InMemoryPersistenceClient::new()))
            .build();

        assert!(matches!(result, Err(TurnError::Config(_))));
    }

    #[test]
    fn test_builder_requires_store() {
        assert!(ChatSessionBuilder::new().build().is_err());
    }
}
