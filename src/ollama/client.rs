//! Ollama API client
//!
//! Streaming chat via `POST /api/chat` over HTTP/1.1, consumed chunk by
//! chunk with reqwest's byte stream. A dedicated task reads and parses the
//! response and feeds text fragments into a bounded channel; the relay is
//! the single consumer.

use crate::errors::{ChatError, Result};
use crate::ollama::parser::ChunkParser;
use crate::relay::ChatBackend;
use crate::types::Message;
use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::sync::mpsc;

/// Default Ollama API endpoint
pub const DEFAULT_OLLAMA_URL: &str = "http://127.0.0.1:11434";

/// Default model tag (`ollama create OMI` builds it from the Modelfile)
pub const DEFAULT_MODEL: &str = "OMI";

/// Connection timeout; generation itself is not bounded
const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Fragment channel capacity between the reader task and the relay
const FRAGMENT_CHANNEL_CAPACITY: usize = 64;

/// Ollama streaming chat client
#[derive(Debug, Clone)]
pub struct OllamaClient {
    client: Client,
    base_url: String,
    model: String,
}

impl OllamaClient {
    /// Create a client with default endpoint and model
    pub fn new() -> Result<Self> {
        Self::with_config(DEFAULT_OLLAMA_URL, DEFAULT_MODEL)
    }

    /// Create a client with custom endpoint and model
    pub fn with_config(base_url: &str, model: &str) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .map_err(ChatError::Http)?;

        Ok(OllamaClient {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
        })
    }

    /// Check if the Ollama API is reachable
    pub async fn health_check(&self) -> bool {
        let url = format!("{}/api/version", self.base_url);
        match self.client.get(&url).send().await {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }

    /// List locally available model tags
    pub async fn list_models(&self) -> Result<Vec<String>> {
        let url = format!("{}/api/tags", self.base_url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ChatError::OllamaApi(format!("Failed to list models: {}", e)))?;

        if !response.status().is_success() {
            return Err(ChatError::OllamaApi(
                "Failed to retrieve model list".to_string(),
            ));
        }

        let tags: TagsResponse = response
            .json()
            .await
            .map_err(|e| ChatError::OllamaApi(format!("Failed to parse model list: {}", e)))?;

        Ok(tags.models.into_iter().map(|m| m.name).collect())
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl ChatBackend for OllamaClient {
    async fn chat_stream(&self, messages: &[Message]) -> Result<mpsc::Receiver<Result<String>>> {
        let url = format!("{}/api/chat", self.base_url);

        let request = ChatRequest {
            model: self.model.clone(),
            messages: messages.to_vec(),
            stream: true,
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| ChatError::OllamaApi(format!("Failed to reach Ollama: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ChatError::OllamaApi(format!("HTTP {}: {}", status, body)));
        }

        let (tx, rx) = mpsc::channel(FRAGMENT_CHANNEL_CAPACITY);
        tokio::spawn(async move {
            let mut bytes = response.bytes_stream();
            let mut parser = ChunkParser::new();

            'outer: while let Some(item) = bytes.next().await {
                let data = match item {
                    Ok(data) => data,
                    Err(e) => {
                        let _ = tx.send(Err(ChatError::Streaming(e.to_string()))).await;
                        return;
                    }
                };

                let objects = match parser.add_bytes(&data) {
                    Ok(objects) => objects,
                    Err(e) => {
                        let _ = tx.send(Err(e)).await;
                        return;
                    }
                };

                for json in objects {
                    let chunk = match parser.parse_chunk(&json) {
                        Ok(chunk) => chunk,
                        Err(e) => {
                            let _ = tx.send(Err(e)).await;
                            return;
                        }
                    };

                    if let Some(error) = chunk.error {
                        let _ = tx.send(Err(ChatError::OllamaApi(error))).await;
                        return;
                    }

                    if let Some(message) = chunk.message {
                        if !message.content.is_empty()
                            && tx.send(Ok(message.content)).await.is_err()
                        {
                            // Consumer went away; stop reading
                            return;
                        }
                    }

                    if chunk.done {
                        break 'outer;
                    }
                }
            }
            // Channel closes on drop, signalling end-of-stream
        });

        Ok(rx)
    }
}

/// Chat request body for `/api/chat`
#[derive(Debug, Clone, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<Message>,
    stream: bool,
}

/// `/api/tags` response
#[derive(Debug, Deserialize)]
struct TagsResponse {
    models: Vec<ModelInfo>,
}

#[derive(Debug, Deserialize)]
struct ModelInfo {
    name: String,
}
