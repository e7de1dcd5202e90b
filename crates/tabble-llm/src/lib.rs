pub mod types;
pub mod error;
pub mod config;
pub mod traits;
pub mod streaming;
pub mod buffer_utils;
pub mod dedup;
pub mod http;

pub use types::{ContentPart, Role, ThreadMessage, ToolCallPart};
pub use error::{ChatError, DecodeError};
pub use config::ChatClientConfig;
pub use traits::{ChatClient, ChatRequest};
pub use streaming::{decode_frame, decode_frame_stream, ByteStream, EventStream, StreamEvent};
pub use buffer_utils::{FrameBuffer, FRAME_DELIMITER};
pub use dedup::{dedupe_history, dedupe_message, dedupe_tool_calls};
pub use http::HttpChatClient;
