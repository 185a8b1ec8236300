//! Error types for omichat
//!
//! Provides the crate-wide error enum and result alias. Errors from the
//! search providers and the Ollama runtime are recovered at their module
//! boundaries and never terminate the process.

use thiserror::Error;

/// Main error type for the omichat front-end
#[derive(Error, Debug)]
pub enum ChatError {
    /// A chat turn was submitted while another is still running
    #[error("A reply is still being generated; wait for the current turn to finish")]
    TurnInFlight,

    /// Ollama API errors
    #[error("Ollama API error: {0}")]
    OllamaApi(String),

    /// Stream broke mid-flight
    #[error("Streaming error: {0}")]
    Streaming(String),

    /// Incremental chunk parsing errors
    #[error("Chunk parse error: {0}")]
    ChunkParse(String),

    /// HTTP client errors
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Search backend errors
    #[error("Search error: {0}")]
    Search(String),

    /// Generic errors with context
    #[error("{0}")]
    Generic(String),
}

/// Result type alias for omichat operations
pub type Result<T> = std::result::Result<T, ChatError>;

impl From<anyhow::Error> for ChatError {
    fn from(err: anyhow::Error) -> Self {
        ChatError::Generic(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ChatError::OllamaApi("connection refused".to_string());
        assert!(err.to_string().contains("connection refused"));
    }

    #[test]
    fn test_turn_in_flight_display() {
        let err = ChatError::TurnInFlight;
        assert!(err.to_string().contains("still being generated"));
    }

    #[test]
    fn test_from_anyhow() {
        let err: ChatError = anyhow::anyhow!("boom").into();
        assert!(matches!(err, ChatError::Generic(_)));
        assert_eq!(err.to_string(), "boom");
    }
}
