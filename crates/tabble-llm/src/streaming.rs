use std::pin::Pin;

use bytes::Bytes;
use futures::{Stream, StreamExt};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::buffer_utils::FrameBuffer;
use crate::error::{ChatError, DecodeError};

/// Raw response body, chunked however the transport delivered it
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, ChatError>> + Send>>;

/// Decoded frames of one response, in wire order
pub type EventStream = Pin<Box<dyn Stream<Item = Result<StreamEvent, ChatError>> + Send>>;

/// One decoded frame of the chat response.
///
/// `args` of a tool call has already gone through its second decode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum StreamEvent {
    #[serde(rename = "text")]
    Text { text: String },

    #[serde(rename = "tool-call", rename_all = "camelCase")]
    ToolCall {
        tool_call_id: String,
        tool_name: String,
        args: Value,
    },
}

/// Frame as it appears on the wire, before `args` is decoded
#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum WireFrame {
    #[serde(rename = "text")]
    Text { text: String },

    #[serde(rename = "tool-call", rename_all = "camelCase")]
    ToolCall {
        tool_call_id: String,
        tool_name: String,
        #[serde(default)]
        args: Option<Value>,
    },

    #[serde(other)]
    Unknown,
}

/// Decode a single delimited frame.
///
/// Blank frames and frames of an unknown type yield `Ok(None)`.
pub fn decode_frame(frame: &str) -> Result<Option<StreamEvent>, DecodeError> {
    let frame = frame.trim();
    if frame.is_empty() {
        return Ok(None);
    }

    let wire: WireFrame = serde_json::from_str(frame).map_err(|source| DecodeError::Frame {
        source,
        frame: frame.to_string(),
    })?;

    match wire {
        WireFrame::Text { text } => Ok(Some(StreamEvent::Text { text })),
        WireFrame::ToolCall { tool_call_id, tool_name, args } => {
            let args = match args {
                Some(Value::String(raw)) if raw.trim().is_empty() => Value::Object(Default::default()),
                Some(Value::String(raw)) => {
                    serde_json::from_str(&raw).map_err(|source| DecodeError::Args {
                        tool_call_id: tool_call_id.clone(),
                        source,
                    })?
                }
                Some(Value::Null) | None => Value::Object(Default::default()),
                Some(other) => other,
            };
            Ok(Some(StreamEvent::ToolCall { tool_call_id, tool_name, args }))
        }
        WireFrame::Unknown => {
            tracing::debug!("Skipping frame of unknown type: {}", frame);
            Ok(None)
        }
    }
}

/// Turn a chunked byte stream into a lazy stream of decoded frames.
///
/// Chunk boundaries need not line up with frames. The first transport or
/// decode error is yielded and ends the stream. Dropping the returned stream
/// drops the underlying byte stream.
pub fn decode_frame_stream<S, B>(byte_chunks: S) -> EventStream
where
    S: Stream<Item = Result<B, ChatError>> + Send + 'static,
    B: AsRef<[u8]> + Send + 'static,
{
    Box::pin(async_stream::stream! {
        let mut byte_chunks = Box::pin(byte_chunks);
        let mut buffer = FrameBuffer::with_capacity(4096);

        while let Some(chunk_result) = byte_chunks.next().await {
            let bytes = match chunk_result {
                Ok(bytes) => bytes,
                Err(e) => {
                    yield Err(e);
                    return;
                }
            };
            buffer.extend(bytes.as_ref());

            // Process all complete frames in buffer
            while let Some(frame_result) = buffer.next_frame() {
                let decoded = frame_result.and_then(|frame| decode_frame(&frame));
                match decoded {
                    Ok(Some(event)) => yield Ok(event),
                    Ok(None) => continue,
                    Err(e) => {
                        yield Err(ChatError::Decode(e));
                        return;
                    }
                }
            }
        }

        if let Some(rest) = buffer.take_remainder() {
            tracing::warn!(
                bytes = rest.len(),
                "Stream ended inside an undelimited frame, dropping trailing bytes"
            );
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_text_frame() {
        let event = decode_frame(r#"{"type":"text","text":"Hi"}"#).unwrap();
        assert_eq!(event, Some(StreamEvent::Text { text: "Hi".to_string() }));
    }

    #[test]
    fn test_decode_tool_call_decodes_args_twice() {
        let frame = r#"{"type":"tool-call","toolCallId":"c1","toolName":"web","args":"{\"query\":\"rust\"}"}"#;
        let event = decode_frame(frame).unwrap().unwrap();
        assert_eq!(
            event,
            StreamEvent::ToolCall {
                tool_call_id: "c1".to_string(),
                tool_name: "web".to_string(),
                args: json!({"query": "rust"}),
            }
        );
    }

    #[test]
    fn test_decode_blank_frame_is_skipped() {
        assert!(decode_frame("  \n ").unwrap().is_none());
    }

    #[test]
    fn test_decode_unknown_type_is_skipped() {
        assert!(decode_frame(r#"{"type":"reasoning","text":"hmm"}"#).unwrap().is_none());
    }

    #[test]
    fn test_decode_malformed_json() {
        let err = decode_frame(r#"{"type":"text","text":"#).unwrap_err();
        assert!(matches!(err, DecodeError::Frame { .. }));
    }

    #[test]
    fn test_decode_malformed_args() {
        let frame = r#"{"type":"tool-call","toolCallId":"c1","toolName":"web","args":"{oops"}"#;
        let err = decode_frame(frame).unwrap_err();
        match err {
            DecodeError::Args { tool_call_id, .. } => assert_eq!(tool_call_id, "c1"),
            other => panic!("Expected Args error, got {:?}", other),
        }
    }

    #[test]
    fn test_stream_event_serialization() {
        let event = StreamEvent::ToolCall {
            tool_call_id: "c".to_string(),
            tool_name: "t".to_string(),
            args: json!({}),
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"type\":\"tool-call\""));
        assert!(json.contains("\"toolCallId\":\"c\""));
    }
}
