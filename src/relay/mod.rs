//! Streaming chat relay: drives one turn from submission to completion
//!
//! The relay owns the transcript and connects it to a streaming chat
//! backend on one side and a presentation sink on the other. One producer
//! (the backend's fragment stream) feeds one consumer (the sink); the
//! transcript is mutated only at turn boundaries.
//!
//! Turn lifecycle: append the user message, invoke the backend with the
//! full transcript as context, forward fragments to the sink in producer
//! order while accumulating them, then commit the accumulated text as a
//! single assistant message. A failed turn commits a single diagnostic
//! assistant message instead; partial output is never committed.

pub mod events;

use crate::errors::{ChatError, Result};
use crate::transcript::Transcript;
use crate::types::Message;
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use tokio::sync::mpsc;

pub use events::{ChannelSink, EventSink, NullSink, RelayEvent};

/// Streaming chat call abstraction
///
/// Implementations take the ordered, role-tagged transcript and return a
/// channel of incremental text fragments. End-of-stream is the channel
/// closing; transport failures surface as an `Err` item (mid-stream) or as
/// an `Err` return (the call itself failed).
#[async_trait]
pub trait ChatBackend: Send + Sync {
    async fn chat_stream(&self, messages: &[Message]) -> Result<mpsc::Receiver<Result<String>>>;
}

/// Relay state over the course of a turn
///
/// `AwaitingFirstFragment` is distinct from `Streaming` so sinks can show
/// a pending affordance until the first fragment lands. Every turn ends
/// back at `Idle`, success or failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayState {
    Idle,
    AwaitingFirstFragment,
    Streaming,
}

/// Result of one submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnOutcome {
    /// Input was empty after trimming; nothing happened
    Ignored,

    /// The reply streamed to completion and was committed
    Completed { content: String },

    /// The turn failed; the committed diagnostic assistant message
    Failed { diagnostic: String },
}

/// The streaming relay, owner of the session transcript
pub struct ChatRelay<B: ChatBackend> {
    backend: B,
    transcript: Mutex<Transcript>,
    busy: AtomicBool,
    state: Mutex<RelayState>,
}

impl<B: ChatBackend> ChatRelay<B> {
    /// Create a relay with an empty transcript
    pub fn new(backend: B) -> Self {
        ChatRelay {
            backend,
            transcript: Mutex::new(Transcript::new()),
            busy: AtomicBool::new(false),
            state: Mutex::new(RelayState::Idle),
        }
    }

    /// Submit one user turn
    ///
    /// Empty-after-trim input is a no-op. A submission while another turn
    /// is in flight is rejected with `ChatError::TurnInFlight` without
    /// touching the transcript. Otherwise the transcript grows by exactly
    /// two messages (user plus assistant or diagnostic) before this
    /// returns.
    pub async fn submit<S: EventSink + ?Sized>(
        &self,
        text: &str,
        sink: &S,
    ) -> Result<TurnOutcome> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Ok(TurnOutcome::Ignored);
        }

        if self
            .busy
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(ChatError::TurnInFlight);
        }

        let outcome = self.run_turn(trimmed, sink).await;

        self.set_state(RelayState::Idle);
        self.busy.store(false, Ordering::SeqCst);
        Ok(outcome)
    }

    async fn run_turn<S: EventSink + ?Sized>(&self, trimmed: &str, sink: &S) -> TurnOutcome {
        let user = Message::user(trimmed);
        self.lock_transcript().append(user.clone());
        sink.emit(RelayEvent::UserCommitted { message: user }).await;

        self.set_state(RelayState::AwaitingFirstFragment);
        sink.emit(RelayEvent::AwaitingReply).await;

        let context = self.snapshot();
        let mut rx = match self.backend.chat_stream(&context).await {
            Ok(rx) => rx,
            Err(e) => return self.fail_turn(e, sink).await,
        };

        let mut accumulated = String::new();
        let mut first = true;
        while let Some(item) = rx.recv().await {
            match item {
                Ok(fragment) => {
                    if first {
                        self.set_state(RelayState::Streaming);
                        first = false;
                    }
                    accumulated.push_str(&fragment);
                    sink.emit(RelayEvent::Fragment { text: fragment }).await;
                }
                Err(e) => return self.fail_turn(e, sink).await,
            }
        }

        self.lock_transcript()
            .append(Message::assistant(accumulated.clone()));
        sink.emit(RelayEvent::TurnComplete {
            content: accumulated.clone(),
        })
        .await;

        TurnOutcome::Completed {
            content: accumulated,
        }
    }

    /// Commit the diagnostic in place of a reply; accumulated partial
    /// output is discarded, never committed.
    async fn fail_turn<S: EventSink + ?Sized>(&self, err: ChatError, sink: &S) -> TurnOutcome {
        let diagnostic = format!("[Error: {}]", err);
        self.lock_transcript()
            .append(Message::assistant(diagnostic.clone()));
        sink.emit(RelayEvent::TurnFailed {
            diagnostic: diagnostic.clone(),
        })
        .await;

        TurnOutcome::Failed { diagnostic }
    }

    /// Full ordered transcript snapshot
    pub fn snapshot(&self) -> Vec<Message> {
        self.lock_transcript().snapshot()
    }

    /// Number of committed messages
    pub fn transcript_len(&self) -> usize {
        self.lock_transcript().len()
    }

    /// Reset the transcript to empty
    ///
    /// Rejected while a turn is in flight; a subsequent turn then behaves
    /// exactly like a fresh session.
    pub fn clear(&self) -> Result<()> {
        if self.busy.load(Ordering::SeqCst) {
            return Err(ChatError::TurnInFlight);
        }
        self.lock_transcript().clear();
        Ok(())
    }

    /// Plain-text export of the full transcript
    pub fn export_plain_text(&self) -> String {
        self.lock_transcript().to_plain_text()
    }

    /// Current relay state
    pub fn state(&self) -> RelayState {
        *self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Whether a turn is currently in flight
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::SeqCst)
    }

    fn set_state(&self, state: RelayState) {
        *self.state.lock().unwrap_or_else(|e| e.into_inner()) = state;
    }

    fn lock_transcript(&self) -> std::sync::MutexGuard<'_, Transcript> {
        self.transcript.lock().unwrap_or_else(|e| e.into_inner())
    }
}
