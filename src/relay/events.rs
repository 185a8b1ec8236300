//! Relay event delivery to presentation sinks
//!
//! The relay produces an ordered sequence of events per turn; a sink
//! consumes them on whatever thread or loop owns the presentation layer.
//! `ChannelSink` marshals events across threads over a bounded tokio
//! channel without dropping any (fragment loss would break the guarantee
//! that delivered fragments concatenate to the committed reply); the REPL
//! uses a direct terminal sink instead since stdout lives on the same task.

use crate::types::Message;
use async_trait::async_trait;
use tokio::sync::mpsc;

/// Events emitted by the relay over the course of one chat turn
///
/// Per-turn order is always: `UserCommitted`, `AwaitingReply`, zero or more
/// `Fragment`s, then exactly one of `TurnComplete` / `TurnFailed`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelayEvent {
    /// The user message was appended to the transcript
    UserCommitted { message: Message },

    /// The runtime call is underway; no fragment has arrived yet.
    /// Sinks may show a pending affordance (spinner, typing indicator).
    AwaitingReply,

    /// One incremental piece of the reply, in producer order
    Fragment { text: String },

    /// The full reply was committed to the transcript
    TurnComplete { content: String },

    /// The turn failed; `diagnostic` is the assistant message that was
    /// committed in place of a reply
    TurnFailed { diagnostic: String },
}

/// Consumer side of the relay's event sequence
#[async_trait]
pub trait EventSink: Send + Sync {
    async fn emit(&self, event: RelayEvent);
}

/// Channel-backed sink for cross-thread presentation layers
///
/// Capacity 256; `emit` awaits on a full channel rather than dropping, so
/// a slow consumer back-pressures the producer instead of losing fragments.
pub struct ChannelSink {
    sender: mpsc::Sender<RelayEvent>,
}

impl ChannelSink {
    pub fn new() -> (Self, mpsc::Receiver<RelayEvent>) {
        let (sender, receiver) = mpsc::channel(256);
        (ChannelSink { sender }, receiver)
    }
}

#[async_trait]
impl EventSink for ChannelSink {
    async fn emit(&self, event: RelayEvent) {
        // A dropped receiver means the presentation layer went away; the
        // turn still runs to completion against the transcript.
        let _ = self.sender.send(event).await;
    }
}

/// Sink that discards all events, for headless turns and tests
pub struct NullSink;

#[async_trait]
impl EventSink for NullSink {
    async fn emit(&self, _event: RelayEvent) {}
}
