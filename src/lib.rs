//! omichat - Terminal chat front-end for local Ollama models
//!
//! # Architecture
//!
//! - **relay**: the core streaming chat relay and transcript ownership
//! - **ollama**: `ChatBackend` implementation against a local Ollama server
//! - **search**: interchangeable DuckDuckGo / SearXNG result providers
//! - **repl**: interactive terminal loop wiring everything together

pub mod cli;
pub mod errors;
pub mod ollama;
pub mod relay;
pub mod repl;
pub mod search;
pub mod transcript;
pub mod types;

// Re-export commonly used types
pub use errors::{ChatError, Result};
pub use relay::{ChatBackend, ChatRelay, RelayEvent, RelayState, TurnOutcome};
pub use transcript::Transcript;
pub use types::{Message, Role, SearchResult};
