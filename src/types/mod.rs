//! Shared data types for the chat front-end

pub mod messages;

pub use messages::{Message, Role, SearchResult};
