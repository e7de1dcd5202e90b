pub mod models;
pub mod adapters;
pub mod dbs;
pub mod accumulator;
pub mod trait_client;
pub mod error;
pub mod builder;

pub use models::{HistoryItem, InitializeResult, ThreadListItem, ThreadStatus, DEFAULT_THREAD_TITLE};
pub use adapters::{
    derive_title, RemoteThreadHistory, RemoteThreadList, ThreadHistoryAdapter, ThreadListAdapter,
    TitleStream,
};
pub use dbs::{HttpPersistenceClient, InMemoryPersistenceClient};
pub use accumulator::{TurnAccumulator, TurnSnapshot};
pub use trait_client::PersistenceClient;
pub use error::{ApiError, USER_FACING_MESSAGE};
pub use builder::PersistClientBuilder;
