pub mod turn;
pub mod orchestrator;
pub mod session;
pub mod builder;
pub mod config;
pub mod error;

pub use turn::{Turn, TurnOutcome, TurnState};
pub use orchestrator::{TurnHandle, TurnRunner, DEFAULT_CHANNEL_CAPACITY};
pub use session::{ChatSession, ThreadRuntime};
pub use builder::ChatSessionBuilder;
pub use config::{ApiConfig, LoggingConfig, RuntimeConfig, TurnConfig};
pub use error::TurnError;

pub use tokio_util::sync::CancellationToken;
