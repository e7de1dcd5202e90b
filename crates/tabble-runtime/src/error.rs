use tabble_llm::ChatError;
use tabble_persist::ApiError;
use thiserror::Error;

use crate::turn::TurnState;

#[derive(Error, Debug)]
pub enum TurnError {
    #[error(transparent)]
    Chat(#[from] ChatError),

    #[error("Persistence error: {0}")]
    Persist(#[from] ApiError),

    #[error("Invalid turn transition: {from:?} -> {to:?}")]
    InvalidTransition { from: TurnState, to: TurnState },

    #[error("Turn task aborted: {0}")]
    Aborted(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, TurnError>;
