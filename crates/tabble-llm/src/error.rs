use thiserror::Error;

/// A frame was delimited correctly but its contents could not be decoded.
///
/// Aborts the whole stream; no partial-frame recovery is attempted.
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("Failed to parse frame: {source}")]
    Frame {
        #[source]
        source: serde_json::Error,
        frame: String,
    },

    #[error("Failed to parse args of tool call {tool_call_id}: {source}")]
    Args {
        tool_call_id: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid UTF-8 in frame: {0}")]
    Utf8(#[from] std::str::Utf8Error),
}

#[derive(Error, Debug)]
pub enum ChatError {
    #[error("HTTP error! status: {status}")]
    Transport { status: u16, body: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Stream error: {0}")]
    Stream(String),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl ChatError {
    /// Non-OK status, network failure or a broken body stream
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            ChatError::Transport { .. } | ChatError::Network(_) | ChatError::Stream(_)
        )
    }

    pub fn is_decode(&self) -> bool {
        matches!(self, ChatError::Decode(_))
    }
}

pub type Result<T> = std::result::Result<T, ChatError>;
