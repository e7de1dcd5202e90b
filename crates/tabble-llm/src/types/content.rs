use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// One renderable piece of a message.
///
/// Serialized with a `type` tag so the wire shape matches what the chat
/// endpoint and the thread store exchange:
/// `{"type":"text","text":"..."}` or
/// `{"type":"tool-call","toolCallId":"...","toolName":"...","args":{...}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ContentPart {
    #[serde(rename = "text")]
    Text { text: String },

    #[serde(rename = "tool-call")]
    ToolCall(ToolCallPart),
}

/// A tool invocation as seen by the UI.
///
/// Several parts in one message may share a `tool_call_id`; each is a
/// successive partial update of the same call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolCallPart {
    pub tool_call_id: String,
    pub tool_name: String,
    #[serde(default = "empty_args", deserialize_with = "deserialize_args")]
    pub args: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
}

impl ToolCallPart {
    pub fn new(tool_call_id: impl Into<String>, tool_name: impl Into<String>, args: Value) -> Self {
        Self {
            tool_call_id: tool_call_id.into(),
            tool_name: tool_name.into(),
            args,
            result: None,
        }
    }

    pub fn with_result(mut self, result: Value) -> Self {
        self.result = Some(result);
        self
    }
}

impl ContentPart {
    /// Create a text part
    pub fn text(s: impl Into<String>) -> Self {
        Self::Text { text: s.into() }
    }

    pub fn tool_call(part: ToolCallPart) -> Self {
        Self::ToolCall(part)
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text { text } => Some(text),
            Self::ToolCall(_) => None,
        }
    }

    pub fn as_tool_call(&self) -> Option<&ToolCallPart> {
        match self {
            Self::ToolCall(call) => Some(call),
            Self::Text { .. } => None,
        }
    }

    pub fn tool_call_id(&self) -> Option<&str> {
        self.as_tool_call().map(|call| call.tool_call_id.as_str())
    }
}

impl From<ToolCallPart> for ContentPart {
    fn from(part: ToolCallPart) -> Self {
        Self::ToolCall(part)
    }
}

fn empty_args() -> Value {
    Value::Object(Default::default())
}

/// Accept `args` either as a JSON value or as a JSON document encoded in a
/// string; the store may hand back the latter.
fn deserialize_args<'de, D>(deserializer: D) -> Result<Value, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(raw) if raw.trim().is_empty() => empty_args(),
        Value::String(raw) => serde_json::from_str(&raw).unwrap_or(Value::String(raw)),
        Value::Null => empty_args(),
        other => other,
    })
}
