//! SearXNG adapter over a configurable instance's JSON API
//!
//! SearXNG aggregates real engine results and exposes them as
//! `{title, url, content}` records under `/search?format=json`; the
//! instance URL comes from configuration since public instances vary.

use crate::errors::{ChatError, Result};
use crate::search::SearchProvider;
use crate::types::SearchResult;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Default public SearXNG instance
pub const DEFAULT_SEARX_URL: &str = "https://searx.be";

/// SearXNG search provider
#[derive(Debug, Clone)]
pub struct SearxProvider {
    client: Client,
    base_url: String,
}

impl SearxProvider {
    pub fn new(base_url: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(ChatError::Http)?;
        Ok(SearxProvider {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl SearchProvider for SearxProvider {
    fn name(&self) -> &str {
        "searx"
    }

    async fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchResult>> {
        let url = format!("{}/search", self.base_url);

        let response = self
            .client
            .get(&url)
            .query(&[("q", query), ("format", "json")])
            .send()
            .await
            .map_err(|e| ChatError::Search(format!("SearXNG request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(ChatError::Search(format!(
                "SearXNG returned HTTP {}",
                response.status()
            )));
        }

        let body: SearxResponse = response
            .json()
            .await
            .map_err(|e| ChatError::Search(format!("SearXNG response malformed: {}", e)))?;

        Ok(body
            .results
            .into_iter()
            .take(limit)
            .map(|r| SearchResult {
                title: r.title,
                link: r.url,
                summary: r.content,
            })
            .collect())
    }
}

#[derive(Debug, Deserialize)]
struct SearxResponse {
    #[serde(default)]
    results: Vec<SearxHit>,
}

#[derive(Debug, Deserialize)]
struct SearxHit {
    #[serde(default)]
    title: String,
    #[serde(default)]
    url: String,
    #[serde(default)]
    content: String,
}
