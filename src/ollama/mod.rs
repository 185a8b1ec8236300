//! Ollama runtime binding
//!
//! Implements the relay's `ChatBackend` abstraction against a local
//! Ollama server: streaming chat, health check, and model listing.

pub mod client;
pub mod parser;

pub use client::{OllamaClient, DEFAULT_MODEL, DEFAULT_OLLAMA_URL};
pub use parser::{ChatChunk, ChunkParser};
