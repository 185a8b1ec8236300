//! Conversation transcript: ordered, append-only message log
//!
//! The transcript is both the render source for the presentation layer and
//! the exact context resent to the runtime on every turn. There is no
//! truncation or summarization; the full history goes out each time.
//!
//! No role-alternation invariant is enforced. The common case is strict
//! user/assistant alternation, but consecutive same-role entries are
//! tolerated (a failed turn still commits a diagnostic assistant message,
//! and nothing downstream depends on alternation).

use crate::types::{Message, Role};

/// Ordered, append-only log of committed chat messages
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    messages: Vec<Message>,
}

impl Transcript {
    /// Create an empty transcript
    pub fn new() -> Self {
        Transcript {
            messages: Vec::new(),
        }
    }

    /// Append a committed message
    ///
    /// Complexity: O(1) amortized, always succeeds
    pub fn append(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// Full ordered snapshot, used both for rendering and for building the
    /// next runtime request
    pub fn snapshot(&self) -> Vec<Message> {
        self.messages.clone()
    }

    /// Borrow the ordered messages without cloning
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Empty the transcript
    ///
    /// Callers must ensure no turn is in flight; the relay guards this with
    /// its busy flag.
    pub fn clear(&mut self) {
        self.messages.clear();
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Serialize as blank-line-separated `"<RoleLabel>: <content>"` blocks
    pub fn to_plain_text(&self) -> String {
        let mut out = String::new();
        for msg in &self.messages {
            out.push_str(msg.role.label());
            out.push_str(": ");
            out.push_str(&msg.content);
            out.push_str("\n\n");
        }
        out
    }

    /// Count of user messages, i.e. attempted turns
    pub fn turn_count(&self) -> usize {
        self.messages
            .iter()
            .filter(|m| m.role == Role::User)
            .count()
    }
}
