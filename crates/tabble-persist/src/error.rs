use thiserror::Error;

/// Shown to the user for any persistence failure
pub const USER_FACING_MESSAGE: &str = "We're having temporary problems. Please try again.";

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error: {status} - {body}")]
    Status { status: u16, body: String },

    #[error("Thread not found: {0}")]
    ThreadNotFound(String),

    #[error("Thread already exists: {0}")]
    ThreadExists(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ApiError {
    /// Static message suitable for display; details stay in the logs
    pub fn user_message(&self) -> &'static str {
        USER_FACING_MESSAGE
    }

    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            ApiError::ThreadNotFound(_) | ApiError::Status { status: 404, .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;
