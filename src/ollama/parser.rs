//! Incremental parser for the Ollama streaming chat response
//!
//! The `/api/chat` stream is a sequence of JSON objects, but HTTP chunk
//! boundaries do not respect object boundaries: one read may carry half an
//! object or several. This parser accumulates bytes and extracts complete
//! objects with a single-pass brace-matching scan that is string- and
//! escape-aware, so braces inside reply text never confuse it.

use crate::errors::{ChatError, Result};
use serde::Deserialize;

/// Maximum accumulation buffer (1MB)
pub const MAX_BUFFER_SIZE: usize = 1_048_576;

/// One parsed object from the chat stream
#[derive(Debug, Clone, Deserialize)]
pub struct ChatChunk {
    #[serde(default)]
    pub message: Option<ChunkMessage>,

    #[serde(default)]
    pub done: bool,

    /// Ollama reports failures mid-stream as `{"error": "..."}`
    #[serde(default)]
    pub error: Option<String>,
}

/// The message part of a chat chunk
#[derive(Debug, Clone, Deserialize)]
pub struct ChunkMessage {
    #[serde(default)]
    pub content: String,
}

/// Incremental chunk extractor
#[derive(Debug)]
pub struct ChunkParser {
    buffer: Vec<u8>,
    max_buffer_size: usize,
}

impl ChunkParser {
    pub fn new() -> Self {
        Self::with_capacity(MAX_BUFFER_SIZE)
    }

    pub fn with_capacity(max_buffer_size: usize) -> Self {
        ChunkParser {
            buffer: Vec::with_capacity(4096),
            max_buffer_size,
        }
    }

    /// Feed bytes and drain every complete JSON object now available
    pub fn add_bytes(&mut self, bytes: &[u8]) -> Result<Vec<String>> {
        if self.buffer.len() + bytes.len() > self.max_buffer_size {
            return Err(ChatError::ChunkParse(format!(
                "Buffer overflow: {} bytes exceeds maximum {}",
                self.buffer.len() + bytes.len(),
                self.max_buffer_size
            )));
        }

        self.buffer.extend_from_slice(bytes);

        let mut objects = Vec::new();
        while let Some((start, end)) = self.find_complete_object()? {
            let json = String::from_utf8_lossy(&self.buffer[start..=end]).to_string();
            self.buffer.drain(..=end);
            objects.push(json);
        }
        Ok(objects)
    }

    /// Brace-matching scan for one complete top-level object
    ///
    /// Tracks string boundaries and backslash escapes so `{` / `}` inside
    /// reply text are ignored. O(n) over the buffered bytes.
    fn find_complete_object(&self) -> Result<Option<(usize, usize)>> {
        let mut depth: i32 = 0;
        let mut start: Option<usize> = None;
        let mut in_string = false;
        let mut escape_next = false;

        for (i, &byte) in self.buffer.iter().enumerate() {
            if escape_next {
                escape_next = false;
                continue;
            }

            if byte == b'\\' && in_string {
                escape_next = true;
                continue;
            }

            if byte == b'"' {
                in_string = !in_string;
                continue;
            }

            if in_string {
                continue;
            }

            match byte {
                b'{' => {
                    if depth == 0 {
                        start = Some(i);
                    }
                    depth += 1;
                }
                b'}' => {
                    depth -= 1;
                    if depth == 0 {
                        if let Some(s) = start {
                            return Ok(Some((s, i)));
                        }
                    }
                    if depth < 0 {
                        return Err(ChatError::ChunkParse(
                            "Mismatched braces: too many closing braces".to_string(),
                        ));
                    }
                }
                _ => {}
            }
        }

        Ok(None)
    }

    /// Parse an extracted object into a `ChatChunk`
    pub fn parse_chunk(&self, json: &str) -> Result<ChatChunk> {
        serde_json::from_str(json)
            .map_err(|e| ChatError::ChunkParse(format!("Failed to parse chat chunk: {}", e)))
    }

    pub fn buffer_size(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }
}

impl Default for ChunkParser {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_chunk_extraction() {
        let mut parser = ChunkParser::new();

        let json = r#"{"message": {"role": "assistant", "content": "Hi"}, "done": false}"#;
        let objects = parser.add_bytes(json.as_bytes()).unwrap();

        assert_eq!(objects, vec![json.to_string()]);
        assert!(parser.is_empty());
    }

    #[test]
    fn test_chunk_split_across_reads() {
        let mut parser = ChunkParser::new();

        assert!(parser
            .add_bytes(br#"{"message": {"content":"#)
            .unwrap()
            .is_empty());
        let objects = parser.add_bytes(br#" "Hel"}, "done": false}"#).unwrap();

        assert_eq!(objects.len(), 1);
        let chunk = parser.parse_chunk(&objects[0]).unwrap();
        assert_eq!(chunk.message.unwrap().content, "Hel");
    }

    #[test]
    fn test_multiple_chunks_in_one_read() {
        let mut parser = ChunkParser::new();

        let data = concat!(
            r#"{"message": {"content": "a"}, "done": false}"#,
            "\n",
            r#"{"message": {"content": "b"}, "done": false}"#,
            "\n",
            r#"{"message": {"content": ""}, "done": true}"#,
        );
        let objects = parser.add_bytes(data.as_bytes()).unwrap();
        assert_eq!(objects.len(), 3);

        let last = parser.parse_chunk(&objects[2]).unwrap();
        assert!(last.done);
    }

    #[test]
    fn test_braces_inside_reply_text() {
        let mut parser = ChunkParser::new();

        let json = r#"{"message": {"content": "fn main() { println!(\"{}\"); }"}, "done": false}"#;
        let objects = parser.add_bytes(json.as_bytes()).unwrap();

        assert_eq!(objects.len(), 1);
        let chunk = parser.parse_chunk(&objects[0]).unwrap();
        assert!(chunk.message.unwrap().content.contains("println!"));
    }

    #[test]
    fn test_error_chunk() {
        let parser = ChunkParser::new();

        let chunk = parser
            .parse_chunk(r#"{"error": "model 'OMI' not found"}"#)
            .unwrap();
        assert_eq!(chunk.error.as_deref(), Some("model 'OMI' not found"));
        assert!(chunk.message.is_none());
    }

    #[test]
    fn test_buffer_overflow() {
        let mut parser = ChunkParser::with_capacity(64);

        let result = parser.add_bytes(&vec![b'a'; 100]);
        assert!(matches!(result, Err(ChatError::ChunkParse(_))));
    }

    #[test]
    fn test_mismatched_closing_brace() {
        let mut parser = ChunkParser::new();

        let result = parser.add_bytes(b"}");
        assert!(matches!(result, Err(ChatError::ChunkParse(_))));
    }

    #[test]
    fn test_leading_whitespace_between_objects() {
        let mut parser = ChunkParser::new();

        let objects = parser
            .add_bytes(b"\n  {\"done\": true}\n")
            .unwrap();
        assert_eq!(objects.len(), 1);
        let chunk = parser.parse_chunk(&objects[0]).unwrap();
        assert!(chunk.done);
    }

    #[test]
    fn test_invalid_json_object_is_a_parse_error() {
        let parser = ChunkParser::new();
        assert!(parser.parse_chunk("{not json}").is_err());
    }
}
