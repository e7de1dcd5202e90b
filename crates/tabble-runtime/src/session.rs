use std::sync::Arc;

use futures::StreamExt;
use tabble_llm::{ChatClient, HttpChatClient, ThreadMessage};
use tabble_persist::{
    HttpPersistenceClient, PersistenceClient, RemoteThreadHistory, RemoteThreadList,
    ThreadHistoryAdapter, ThreadListAdapter, TurnSnapshot,
};
use tokio_util::sync::CancellationToken;

use crate::builder::ChatSessionBuilder;
use crate::config::{RuntimeConfig, TurnConfig};
use crate::error::Result;
use crate::orchestrator::{TurnHandle, TurnRunner};
use crate::turn::TurnOutcome;

/// Shared context for every thread of one user session.
///
/// Holds the chat transport and the store; threads opened from here share
/// both.
pub struct ChatSession {
    chat_client: Arc<dyn ChatClient>,
    store: Arc<dyn PersistenceClient>,
    threads: Arc<dyn ThreadListAdapter>,
    turn_config: TurnConfig,
}

impl ChatSession {
    pub(crate) fn new(
        chat_client: Arc<dyn ChatClient>,
        store: Arc<dyn PersistenceClient>,
        turn_config: TurnConfig,
    ) -> Self {
        let threads: Arc<dyn ThreadListAdapter> =
            Arc::new(RemoteThreadList::new(Arc::clone(&store)));
        Self {
            chat_client,
            store,
            threads,
            turn_config,
        }
    }

    pub fn builder() -> ChatSessionBuilder {
        ChatSessionBuilder::new()
    }

    /// HTTP chat client and REST store, both pointed at `config.api.base_url`
    pub fn from_config(config: &RuntimeConfig) -> Result<Self> {
        let chat_client = HttpChatClient::new(config.api.chat_client_config())?;

        let mut store = HttpPersistenceClient::new(config.api.base_url.clone(), config.api.timeout())?;
        if let Some(user_id) = &config.api.user_id {
            store = store.with_user_id(user_id.clone());
        }

        Ok(Self::new(
            Arc::new(chat_client),
            Arc::new(store),
            config.turn.clone(),
        ))
    }

    pub fn threads(&self) -> Arc<dyn ThreadListAdapter> {
        Arc::clone(&self.threads)
    }

    /// Runtime for a thread. With `None` the thread is local only until it
    /// is initialized.
    pub fn thread(&self, remote_id: Option<String>) -> ThreadRuntime {
        let history: Arc<dyn ThreadHistoryAdapter> = Arc::new(RemoteThreadHistory::new(
            Arc::clone(&self.store),
            remote_id.clone(),
        ));
        let runner = TurnRunner::new(Arc::clone(&self.chat_client))
            .with_history(Arc::clone(&history))
            .with_channel_capacity(self.turn_config.channel_capacity);

        ThreadRuntime {
            remote_id,
            history,
            threads: Arc::clone(&self.threads),
            runner,
            messages: Vec::new(),
        }
    }

    /// Register a new thread with the store and return its runtime
    pub async fn create_thread(&self) -> Result<ThreadRuntime> {
        let local_id = uuid::Uuid::new_v4().to_string();
        let initialized = self.threads.initialize(&local_id).await?;
        Ok(self.thread(Some(initialized.remote_id)))
    }

    /// Runtime for an existing thread with its history already loaded
    pub async fn open_thread(&self, remote_id: impl Into<String>) -> Result<ThreadRuntime> {
        let mut thread = self.thread(Some(remote_id.into()));
        thread.load().await?;
        Ok(thread)
    }
}

/// One conversation thread: its message chain plus the runner for new turns
pub struct ThreadRuntime {
    remote_id: Option<String>,
    history: Arc<dyn ThreadHistoryAdapter>,
    threads: Arc<dyn ThreadListAdapter>,
    runner: TurnRunner,
    messages: Vec<ThreadMessage>,
}

impl ThreadRuntime {
    pub fn remote_id(&self) -> Option<&str> {
        self.remote_id.as_deref()
    }

    pub fn messages(&self) -> &[ThreadMessage] {
        &self.messages
    }

    pub fn history(&self) -> Arc<dyn ThreadHistoryAdapter> {
        Arc::clone(&self.history)
    }

    /// Replace the local chain with the stored history
    pub async fn load(&mut self) -> Result<usize> {
        let items = self.history.load().await?;
        self.messages = items.into_iter().map(|item| item.message).collect();
        Ok(self.messages.len())
    }

    /// Persist `message`, add it to the chain and start a turn over the
    /// whole chain. The completed turn must be handed back through
    /// [`ThreadRuntime::complete_turn`].
    pub async fn send(&mut self, message: ThreadMessage) -> TurnHandle {
        if let Err(e) = self.history.append(&message).await {
            tracing::error!(message_id = %message.id, "Failed to persist message: {}", e);
        }
        self.messages.push(message);
        self.runner.spawn(self.messages.clone())
    }

    /// Add the turn's final message to the chain. After the first exchange
    /// the thread also gets its title.
    pub async fn complete_turn(&mut self, outcome: &TurnOutcome) {
        let Some(message) = &outcome.message else {
            return;
        };
        self.messages.push(message.clone());

        if self.messages.len() == 2 {
            self.generate_title().await;
        }
    }

    /// Send `message` and wait for the turn, calling `on_snapshot` for every
    /// frame
    pub async fn run_turn<F>(
        &mut self,
        message: ThreadMessage,
        cancel: CancellationToken,
        on_snapshot: F,
    ) -> TurnOutcome
    where
        F: FnMut(&TurnSnapshot),
    {
        if let Err(e) = self.history.append(&message).await {
            tracing::error!(message_id = %message.id, "Failed to persist message: {}", e);
        }
        self.messages.push(message);

        let outcome = self
            .runner
            .run(self.messages.clone(), cancel, on_snapshot)
            .await;
        self.complete_turn(&outcome).await;
        outcome
    }

    async fn generate_title(&self) {
        let Some(remote_id) = self.remote_id.as_deref() else {
            return;
        };

        match self.threads.generate_title(remote_id, &self.messages).await {
            Ok(mut tokens) => while tokens.next().await.is_some() {},
            Err(e) => {
                tracing::warn!(thread_id = %remote_id, "Failed to generate title: {}", e);
            }
        }
    }
}

impl std::fmt::Debug for ThreadRuntime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThreadRuntime")
            .field("remote_id", &self.remote_id)
            .field("messages", &self.messages.len())
            .finish()
    }
}

