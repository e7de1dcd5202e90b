use serde::{Deserialize, Serialize};
use tabble_llm::ThreadMessage;
use tabble_persist::TurnSnapshot;

use crate::error::{Result, TurnError};

/// Lifecycle of one turn: `Idle → Streaming → {Complete | Error | Cancelled}`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnState {
    Idle,
    Streaming,
    Complete,
    Error,
    Cancelled,
}

impl TurnState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, TurnState::Complete | TurnState::Error | TurnState::Cancelled)
    }

    /// Only forward moves; a terminal state is never left
    pub fn can_transition_to(&self, next: TurnState) -> bool {
        matches!(
            (self, next),
            (TurnState::Idle, TurnState::Streaming)
                | (TurnState::Streaming, TurnState::Complete)
                | (TurnState::Streaming, TurnState::Error)
                | (TurnState::Streaming, TurnState::Cancelled)
        )
    }
}

/// State tracker for a single turn
#[derive(Debug)]
pub struct Turn {
    id: String,
    state: TurnState,
}

impl Turn {
    pub fn new() -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            state: TurnState::Idle,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn state(&self) -> TurnState {
        self.state
    }

    pub fn advance(&mut self, next: TurnState) -> Result<()> {
        if !self.state.can_transition_to(next) {
            return Err(TurnError::InvalidTransition {
                from: self.state,
                to: next,
            });
        }
        tracing::debug!(turn_id = %self.id, from = ?self.state, to = ?next, "Turn transition");
        self.state = next;
        Ok(())
    }
}

impl Default for Turn {
    fn default() -> Self {
        Self::new()
    }
}

/// How a turn ended
#[derive(Debug)]
pub struct TurnOutcome {
    pub turn_id: String,
    pub state: TurnState,
    /// Last snapshot built before the turn ended
    pub snapshot: TurnSnapshot,
    /// Final assistant message, set only for `Complete`
    pub message: Option<ThreadMessage>,
    /// Why the turn ended in `Error`
    pub error: Option<TurnError>,
    /// Failure to persist the final message; does not change `state`
    pub persist_error: Option<TurnError>,
}

impl TurnOutcome {
    pub fn is_complete(&self) -> bool {
        self.state == TurnState::Complete
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forward_transitions() {
        let mut turn = Turn::new();
        assert_eq!(turn.state(), TurnState::Idle);
        turn.advance(TurnState::Streaming).unwrap();
        turn.advance(TurnState::Complete).unwrap();
        assert!(turn.state().is_terminal());
    }

    #[test]
    fn test_no_resumption_from_terminal_state() {
        for terminal in [TurnState::Complete, TurnState::Error, TurnState::Cancelled] {
            let mut turn = Turn::new();
            turn.advance(TurnState::Streaming).unwrap();
            turn.advance(terminal).unwrap();

            let err = turn.advance(TurnState::Streaming).unwrap_err();
            assert!(matches!(err, TurnError::InvalidTransition { .. }));
            assert_eq!(turn.state(), terminal);
        }
    }

    #[test]
    fn test_idle_cannot_skip_streaming() {
        let mut turn = Turn::new();
        assert!(turn.advance(TurnState::Complete).is_err());
        assert!(turn.advance(TurnState::Idle).is_err());
    }
}
