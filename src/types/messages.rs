//! Message types exchanged between the transcript, the relay, and the
//! Ollama runtime.
//!
//! `Role` and `Message` serialize directly into the shape the Ollama
//! `/api/chat` endpoint expects (`{"role": "user", "content": "..."}`).

use serde::{Deserialize, Serialize};

/// Speaker of a committed transcript message
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    /// Short human label used for rendering and plain-text export
    pub fn label(&self) -> &'static str {
        match self {
            Role::User => "User",
            Role::Assistant => "OMI",
        }
    }
}

/// One committed chat message
///
/// Immutable once appended to the transcript; ordering is chronological.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Message {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Message {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// One ranked web-search hit, mapped into a uniform shape regardless of
/// which backend produced it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    pub title: String,
    pub link: String,
    pub summary: String,
}
