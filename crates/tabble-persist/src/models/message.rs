use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use tabble_llm::{Role, ThreadMessage};

use super::wire::MessageResponse;
use crate::error::{ApiError, Result};

/// A loaded message together with its position in the chain
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryItem {
    pub message: ThreadMessage,
    pub parent_id: Option<String>,
}

impl TryFrom<MessageResponse> for ThreadMessage {
    type Error = ApiError;

    fn try_from(response: MessageResponse) -> Result<Self> {
        let role = parse_role(&response.role)?;
        let created_at = parse_timestamp(&response.created_at)?;

        Ok(ThreadMessage {
            id: response.id,
            role,
            content: response.content,
            created_at,
        })
    }
}

pub fn parse_role(role: &str) -> Result<Role> {
    match role {
        "user" => Ok(Role::User),
        "assistant" => Ok(Role::Assistant),
        "system" => Ok(Role::System),
        other => Err(ApiError::InvalidResponse(format!("Unknown message role: {}", other))),
    }
}

/// Parse an RFC 3339 timestamp, or a naive ISO-8601 one taken as UTC
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Ok(parsed.with_timezone(&Utc));
    }

    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| naive.and_utc())
        .map_err(|e| ApiError::InvalidResponse(format!("Invalid timestamp {:?}: {}", raw, e)))
}

/// Rebuild the parent chain from list order
pub fn chain_messages(messages: Vec<ThreadMessage>) -> Vec<HistoryItem> {
    let mut parent_id: Option<String> = None;
    messages
        .into_iter()
        .map(|message| HistoryItem {
            parent_id: parent_id.replace(message.id.clone()),
            message,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_parse_rfc3339() {
        let ts = parse_timestamp("2025-03-01T10:20:30+02:00").unwrap();
        assert_eq!(ts.hour(), 8);
    }

    #[test]
    fn test_parse_naive_isoformat() {
        let ts = parse_timestamp("2025-03-01T10:20:30.123456").unwrap();
        assert_eq!(ts.day(), 1);
        assert_eq!(ts.hour(), 10);
    }

    #[test]
    fn test_parse_garbage_timestamp() {
        assert!(parse_timestamp("yesterday").is_err());
    }

    #[test]
    fn test_unknown_role() {
        assert!(parse_role("tool").is_err());
    }

    #[test]
    fn test_chain_messages() {
        let messages = vec![
            ThreadMessage::user("a").with_id("m0"),
            ThreadMessage::assistant(vec![]).with_id("m1"),
            ThreadMessage::user("b").with_id("m2"),
        ];

        let chain = chain_messages(messages);

        assert_eq!(chain[0].parent_id, None);
        assert_eq!(chain[1].parent_id.as_deref(), Some("m0"));
        assert_eq!(chain[2].parent_id.as_deref(), Some("m1"));
    }
}
