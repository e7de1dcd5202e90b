use std::sync::Arc;

use futures::StreamExt;
use tabble_llm::{decode_frame_stream, ChatClient, ChatError, ChatRequest, ThreadMessage};
use tabble_persist::{ThreadHistoryAdapter, TurnAccumulator, TurnSnapshot};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::error::{Result, TurnError};
use crate::turn::{Turn, TurnOutcome, TurnState};

pub const DEFAULT_CHANNEL_CAPACITY: usize = 64;

/// How the streaming phase of a turn ended
enum StreamEnd {
    Complete,
    Cancelled,
    Failed(ChatError),
}

/// Drives single turns against a chat backend.
///
/// Each call to [`TurnRunner::spawn`] runs one turn on its own task: the
/// history is deduplicated and sent, the response is decoded frame by frame,
/// and every frame produces a fresh [`TurnSnapshot`] on the returned handle.
/// A completed turn is appended through the history adapter, when one is set.
#[derive(Clone)]
pub struct TurnRunner {
    chat_client: Arc<dyn ChatClient>,
    history: Option<Arc<dyn ThreadHistoryAdapter>>,
    channel_capacity: usize,
}

impl TurnRunner {
    pub fn new(chat_client: Arc<dyn ChatClient>) -> Self {
        Self {
            chat_client,
            history: None,
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }

    pub fn with_history(mut self, history: Arc<dyn ThreadHistoryAdapter>) -> Self {
        self.history = Some(history);
        self
    }

    pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
        self.channel_capacity = capacity.max(1);
        self
    }

    /// Start a turn in the background
    pub fn spawn(&self, messages: Vec<ThreadMessage>) -> TurnHandle {
        let (tx, rx) = mpsc::channel(self.channel_capacity);
        let cancel = CancellationToken::new();

        let chat_client = Arc::clone(&self.chat_client);
        let history = self.history.clone();
        let task_cancel = cancel.clone();

        let task = tokio::spawn(async move {
            Self::execute_turn(chat_client, history, messages, task_cancel, tx).await
        });

        TurnHandle {
            snapshots: rx,
            cancel,
            task,
        }
    }

    /// Run a turn to completion on the current task, calling `on_snapshot`
    /// after every frame
    pub async fn run<F>(
        &self,
        messages: Vec<ThreadMessage>,
        cancel: CancellationToken,
        mut on_snapshot: F,
    ) -> TurnOutcome
    where
        F: FnMut(&TurnSnapshot),
    {
        let (tx, mut rx) = mpsc::channel(self.channel_capacity);
        let turn = Self::execute_turn(
            Arc::clone(&self.chat_client),
            self.history.clone(),
            messages,
            cancel.clone(),
            tx,
        );
        tokio::pin!(turn);

        // Snapshots still buffered once the token fires are discarded
        loop {
            tokio::select! {
                outcome = &mut turn => {
                    while !cancel.is_cancelled() {
                        match rx.try_recv() {
                            Ok(snapshot) => on_snapshot(&snapshot),
                            Err(_) => break,
                        }
                    }
                    return outcome;
                }
                Some(snapshot) = rx.recv(), if !cancel.is_cancelled() => on_snapshot(&snapshot),
            }
        }
    }

    async fn execute_turn(
        chat_client: Arc<dyn ChatClient>,
        history: Option<Arc<dyn ThreadHistoryAdapter>>,
        messages: Vec<ThreadMessage>,
        cancel: CancellationToken,
        snapshot_tx: mpsc::Sender<TurnSnapshot>,
    ) -> TurnOutcome {
        let mut turn = Turn::new();
        let mut accumulator = TurnAccumulator::new();

        Self::transition(&mut turn, TurnState::Streaming);
        tracing::info!(turn_id = %turn.id(), messages = messages.len(), "Starting turn");

        let end = Self::stream_turn(
            chat_client.as_ref(),
            messages,
            &cancel,
            &snapshot_tx,
            &mut accumulator,
        )
        .await;

        let frames = accumulator.frames_seen();
        let snapshot = accumulator.into_snapshot();

        match end {
            StreamEnd::Complete => {
                Self::transition(&mut turn, TurnState::Complete);
                let message = snapshot.to_message();
                tracing::info!(turn_id = %turn.id(), frames, "Turn complete");

                let persist_error = match history {
                    Some(history) => match history.append(&message).await {
                        Ok(()) => None,
                        Err(e) => {
                            tracing::error!(
                                turn_id = %turn.id(),
                                message_id = %message.id,
                                "Failed to persist assistant message: {}",
                                e
                            );
                            Some(TurnError::Persist(e))
                        }
                    },
                    None => None,
                };

                TurnOutcome {
                    turn_id: turn.id().to_string(),
                    state: turn.state(),
                    snapshot,
                    message: Some(message),
                    error: None,
                    persist_error,
                }
            }
            StreamEnd::Cancelled => {
                Self::transition(&mut turn, TurnState::Cancelled);
                tracing::info!(turn_id = %turn.id(), frames, "Turn cancelled");

                TurnOutcome {
                    turn_id: turn.id().to_string(),
                    state: turn.state(),
                    snapshot,
                    message: None,
                    error: None,
                    persist_error: None,
                }
            }
            StreamEnd::Failed(e) => {
                Self::transition(&mut turn, TurnState::Error);
                tracing::error!(turn_id = %turn.id(), frames, "Turn failed: {}", e);

                TurnOutcome {
                    turn_id: turn.id().to_string(),
                    state: turn.state(),
                    snapshot,
                    message: None,
                    error: Some(TurnError::Chat(e)),
                    persist_error: None,
                }
            }
        }
    }

    fn transition(turn: &mut Turn, next: TurnState) {
        if let Err(e) = turn.advance(next) {
            tracing::error!(turn_id = %turn.id(), "{}", e);
        }
    }

    /// Streaming phase. The response stream is owned here and dropped on
    /// every return path.
    async fn stream_turn(
        chat_client: &dyn ChatClient,
        messages: Vec<ThreadMessage>,
        cancel: &CancellationToken,
        snapshot_tx: &mpsc::Sender<TurnSnapshot>,
        accumulator: &mut TurnAccumulator,
    ) -> StreamEnd {
        let request = ChatRequest::new(messages).deduplicated();

        let bytes = tokio::select! {
            biased;
            _ = cancel.cancelled() => return StreamEnd::Cancelled,
            response = chat_client.chat_stream(request) => match response {
                Ok(bytes) => bytes,
                Err(e) => return StreamEnd::Failed(e),
            },
        };

        let mut events = decode_frame_stream(bytes);

        loop {
            let next = tokio::select! {
                biased;
                _ = cancel.cancelled() => return StreamEnd::Cancelled,
                next = events.next() => next,
            };

            let event = match next {
                None => return StreamEnd::Complete,
                Some(Err(e)) => return StreamEnd::Failed(e),
                Some(Ok(event)) => event,
            };

            let snapshot = accumulator.push(event).clone();

            tokio::select! {
                biased;
                _ = cancel.cancelled() => return StreamEnd::Cancelled,
                sent = snapshot_tx.send(snapshot) => {
                    if sent.is_err() {
                        tracing::debug!("Snapshot receiver dropped, cancelling turn");
                        return StreamEnd::Cancelled;
                    }
                }
            }
        }
    }
}

/// Handle to a turn running in the background
pub struct TurnHandle {
    snapshots: mpsc::Receiver<TurnSnapshot>,
    cancel: CancellationToken,
    task: JoinHandle<TurnOutcome>,
}

impl TurnHandle {
    /// Next snapshot, or None once the turn has ended or been cancelled
    pub async fn next_snapshot(&mut self) -> Option<TurnSnapshot> {
        if self.cancel.is_cancelled() {
            return None;
        }
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => None,
            snapshot = self.snapshots.recv() => snapshot,
        }
    }

    /// Stop the turn. No snapshot is delivered after this returns.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Wait for the turn to end, discarding snapshots not yet received.
    ///
    /// Dropping the handle instead cancels the turn at its next frame.
    pub async fn finish(self) -> Result<TurnOutcome> {
        let TurnHandle {
            mut snapshots,
            task,
            ..
        } = self;

        let drain = async { while snapshots.recv().await.is_some() {} };
        let (_, outcome) = tokio::join!(drain, task);

        outcome.map_err(|e| TurnError::Aborted(e.to_string()))
    }
}
