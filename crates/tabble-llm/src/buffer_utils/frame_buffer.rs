use std::collections::VecDeque;

use crate::error::DecodeError;

/// Literal blank line separating two frames on the wire
pub const FRAME_DELIMITER: &[u8] = b"\n\n";

/// Byte buffer that reassembles delimited frames from arbitrarily split chunks.
///
/// Bytes are kept undecoded until a full delimiter is seen, so a multi-byte
/// character split across two chunks is decoded only once it is whole.
pub struct FrameBuffer {
    buffer: VecDeque<u8>,
    // Offset already searched for a delimiter, so repeated small chunks
    // don't rescan the whole buffer.
    scanned: usize,
}

impl FrameBuffer {
    /// Create a new buffer with specified capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: VecDeque::with_capacity(capacity),
            scanned: 0,
        }
    }

    /// Add bytes to the buffer
    pub fn extend(&mut self, bytes: &[u8]) {
        self.buffer.extend(bytes);
    }

    /// Extract the next delimited frame, without its delimiter.
    ///
    /// Returns None if no complete frame is available yet.
    pub fn next_frame(&mut self) -> Option<Result<String, DecodeError>> {
        let pos = self.find_delimiter()?;

        let mut frame_bytes: Vec<u8> = self.buffer.drain(..pos + FRAME_DELIMITER.len()).collect();
        frame_bytes.truncate(pos);
        self.scanned = 0;

        match std::str::from_utf8(&frame_bytes) {
            Ok(frame) => Some(Ok(frame.to_string())),
            Err(e) => Some(Err(DecodeError::Utf8(e))),
        }
    }

    /// Undelimited bytes left over once the input has ended.
    ///
    /// Returns None when nothing but whitespace remains.
    pub fn take_remainder(&mut self) -> Option<String> {
        let bytes: Vec<u8> = self.buffer.drain(..).collect();
        self.scanned = 0;
        let rest = String::from_utf8_lossy(&bytes);
        let rest = rest.trim();
        if rest.is_empty() {
            None
        } else {
            Some(rest.to_string())
        }
    }

    fn find_delimiter(&mut self) -> Option<usize> {
        let haystack = self.buffer.make_contiguous();
        let start = self.scanned;
        let found = haystack
            .get(start..)?
            .windows(FRAME_DELIMITER.len())
            .position(|window| window == FRAME_DELIMITER)
            .map(|offset| start + offset);

        if found.is_none() {
            // The last byte may be the first half of a delimiter.
            self.scanned = haystack.len().saturating_sub(FRAME_DELIMITER.len() - 1);
        }
        found
    }

    /// Current buffer size
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Check if buffer is empty
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_buffer_basic() {
        let mut buffer = FrameBuffer::with_capacity(64);

        buffer.extend(b"one\n\ntwo\n\n");

        assert_eq!(buffer.next_frame().unwrap().unwrap(), "one");
        assert_eq!(buffer.next_frame().unwrap().unwrap(), "two");
        assert!(buffer.next_frame().is_none());
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_partial_frame() {
        let mut buffer = FrameBuffer::with_capacity(64);

        buffer.extend(b"partial");
        assert!(buffer.next_frame().is_none());

        buffer.extend(b" frame\n");
        assert!(buffer.next_frame().is_none());

        buffer.extend(b"\n");
        assert_eq!(buffer.next_frame().unwrap().unwrap(), "partial frame");
    }

    #[test]
    fn test_single_newline_is_not_a_delimiter() {
        let mut buffer = FrameBuffer::with_capacity(64);

        buffer.extend(b"{\"a\":\n1}\n");
        assert!(buffer.next_frame().is_none());
        assert_eq!(buffer.len(), 9);
    }

    #[test]
    fn test_multibyte_char_split_across_chunks() {
        let bytes = "é\n\n".as_bytes();
        let mut buffer = FrameBuffer::with_capacity(8);

        buffer.extend(&bytes[..1]);
        assert!(buffer.next_frame().is_none());
        buffer.extend(&bytes[1..]);
        assert_eq!(buffer.next_frame().unwrap().unwrap(), "é");
    }

    #[test]
    fn test_remainder() {
        let mut buffer = FrameBuffer::with_capacity(8);

        buffer.extend(b"done\n\n  \n");
        assert_eq!(buffer.next_frame().unwrap().unwrap(), "done");
        assert!(buffer.take_remainder().is_none());

        buffer.extend(b"{\"type\"");
        assert_eq!(buffer.take_remainder().as_deref(), Some("{\"type\""));
    }
}
