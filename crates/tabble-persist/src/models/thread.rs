use serde::{Deserialize, Serialize};

use super::wire::ThreadResponse;

/// Title used for threads that have not been named yet
pub const DEFAULT_THREAD_TITLE: &str = "New Chat";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThreadStatus {
    Regular,
    Archived,
}

impl From<bool> for ThreadStatus {
    fn from(archived: bool) -> Self {
        if archived {
            ThreadStatus::Archived
        } else {
            ThreadStatus::Regular
        }
    }
}

/// A thread as shown in the thread list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreadListItem {
    pub status: ThreadStatus,
    pub remote_id: String,
    pub title: String,
}

impl From<ThreadResponse> for ThreadListItem {
    fn from(thread: ThreadResponse) -> Self {
        let title = thread
            .title
            .filter(|title| !title.is_empty())
            .unwrap_or_else(|| DEFAULT_THREAD_TITLE.to_string());

        Self {
            status: thread.archived.into(),
            remote_id: thread.ui_thread_id,
            title,
        }
    }
}

/// Identity of a freshly registered thread.
///
/// Both ids equal the caller-supplied local id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializeResult {
    pub remote_id: String,
    pub external_id: String,
}
