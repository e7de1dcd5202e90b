mod message;
mod thread;
pub mod wire;

pub use message::{chain_messages, parse_role, parse_timestamp, HistoryItem};
pub use thread::{InitializeResult, ThreadListItem, ThreadStatus, DEFAULT_THREAD_TITLE};
pub use wire::{
    MessageCreateRequest, MessageCreateUpdateResponse, MessageListResponse, MessageResponse,
    ThreadCreateRequest, ThreadCreateUpdateResponse, ThreadListResponse, ThreadResponse,
    ThreadUpdateRequest,
};
