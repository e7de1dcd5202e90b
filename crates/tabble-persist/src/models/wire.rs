//! Request and response bodies of the thread/message REST API.

use serde::{Deserialize, Serialize};
use tabble_llm::ContentPart;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThreadCreateRequest {
    pub ui_thread_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

/// Partial update; absent fields are left untouched by the store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThreadUpdateRequest {
    pub ui_thread_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub archived: Option<bool>,
}

impl ThreadUpdateRequest {
    pub fn title(ui_thread_id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            ui_thread_id: ui_thread_id.into(),
            title: Some(title.into()),
            archived: None,
        }
    }

    pub fn archived(ui_thread_id: impl Into<String>, archived: bool) -> Self {
        Self {
            ui_thread_id: ui_thread_id.into(),
            title: None,
            archived: Some(archived),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThreadCreateUpdateResponse {
    pub id: String,
    pub ui_thread_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThreadResponse {
    pub id: String,
    pub ui_thread_id: String,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub archived: bool,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThreadListResponse {
    pub threads: Vec<ThreadResponse>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageCreateRequest {
    pub ui_message_id: String,
    pub thread_id: String,
    pub role: String,
    pub content: Vec<ContentPart>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageCreateUpdateResponse {
    pub id: String,
    pub ui_message_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub id: String,
    pub thread_id: String,
    pub role: String,
    pub content: Vec<ContentPart>,
    pub created_at: String,
    #[serde(default)]
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageListResponse {
    pub messages: Vec<MessageResponse>,
}
