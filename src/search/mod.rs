//! Web search providers and result formatting
//!
//! Two interchangeable backends behind one contract: given a free-text
//! query, return up to N ranked results or a human-readable failure line.
//! One best-effort call per invocation; no retries, no caching, no
//! rate-limit handling. The formatted block becomes the content of a
//! synthetic user message fed to the relay for summarization, which treats
//! it as ordinary input.

pub mod duckduckgo;
pub mod searx;

use crate::errors::{ChatError, Result};
use crate::types::SearchResult;
use async_trait::async_trait;

pub use duckduckgo::DuckDuckGoProvider;
pub use searx::SearxProvider;

/// Uniform search contract implemented by every backend adapter
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Backend name for notices and diagnostics
    fn name(&self) -> &str;

    /// Run one query, returning up to `limit` results in backend rank order
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchResult>>;
}

/// Render results as the numbered plain-text block the model summarizes
pub fn format_results(results: &[SearchResult]) -> String {
    let mut output = String::new();
    for (i, r) in results.iter().enumerate() {
        output.push_str(&format!(
            "\n--- RESULT {} ---\nTitle: {}\nLink:  {}\nSummary: {}\n",
            i + 1,
            r.title,
            r.link,
            r.summary
        ));
    }
    output
}

/// Run a query and always come back with displayable text
///
/// Zero results and backend failures are recovered here as single-line
/// diagnostics; no search error propagates further.
pub async fn fetch_formatted(
    provider: &dyn SearchProvider,
    query: &str,
    limit: usize,
) -> String {
    match provider.search(query, limit).await {
        Ok(results) if results.is_empty() => "System: No results found.".to_string(),
        Ok(results) => format_results(&results),
        Err(e) => format!("System: Search failed. Error: {}", e),
    }
}

/// Wrap a formatted result block as the user turn fed to the relay
pub fn summarize_prompt(query: &str, results_block: &str) -> String {
    format!(
        "I searched for '{}'. Here are the results:\n{}\n\nPlease summarize these findings.",
        query, results_block
    )
}

/// Construct the configured backend adapter
pub fn make_provider(backend: &str, searx_url: &str) -> Result<Box<dyn SearchProvider>> {
    match backend {
        "duckduckgo" => Ok(Box::new(DuckDuckGoProvider::new()?)),
        "searx" => Ok(Box::new(SearxProvider::new(searx_url)?)),
        other => Err(ChatError::Config(format!(
            "Unknown search backend '{}' (expected 'duckduckgo' or 'searx')",
            other
        ))),
    }
}
