pub mod content;
pub mod message;

pub use content::{ContentPart, ToolCallPart};
pub use message::{Role, ThreadMessage};
