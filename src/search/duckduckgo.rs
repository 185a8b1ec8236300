//! DuckDuckGo adapter over the keyless Instant Answer JSON API
//!
//! The API returns an abstract (when DuckDuckGo has a direct answer) plus
//! a list of related topics, some of which are nested one level under
//! category groups. Both shapes are flattened into `SearchResult`s here so
//! nothing DuckDuckGo-specific leaks past this adapter.

use crate::errors::{ChatError, Result};
use crate::search::SearchProvider;
use crate::types::SearchResult;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

const API_URL: &str = "https://api.duckduckgo.com/";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// DuckDuckGo Instant Answer search provider
#[derive(Debug, Clone)]
pub struct DuckDuckGoProvider {
    client: Client,
}

impl DuckDuckGoProvider {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(ChatError::Http)?;
        Ok(DuckDuckGoProvider { client })
    }
}

#[async_trait]
impl SearchProvider for DuckDuckGoProvider {
    fn name(&self) -> &str {
        "duckduckgo"
    }

    async fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchResult>> {
        let response = self
            .client
            .get(API_URL)
            .query(&[
                ("q", query),
                ("format", "json"),
                ("no_html", "1"),
                ("skip_disambig", "1"),
            ])
            .send()
            .await
            .map_err(|e| ChatError::Search(format!("DuckDuckGo request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(ChatError::Search(format!(
                "DuckDuckGo returned HTTP {}",
                response.status()
            )));
        }

        let answer: InstantAnswer = response
            .json()
            .await
            .map_err(|e| ChatError::Search(format!("DuckDuckGo response malformed: {}", e)))?;

        Ok(map_results(answer, limit))
    }
}

/// Instant Answer response, reduced to the fields the mapping uses
#[derive(Debug, Deserialize)]
struct InstantAnswer {
    #[serde(rename = "Heading", default)]
    heading: String,

    #[serde(rename = "AbstractText", default)]
    abstract_text: String,

    #[serde(rename = "AbstractURL", default)]
    abstract_url: String,

    #[serde(rename = "RelatedTopics", default)]
    related_topics: Vec<RelatedTopic>,
}

/// Related topics arrive either as direct hits or as named groups of hits
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RelatedTopic {
    Topic {
        #[serde(rename = "FirstURL")]
        first_url: String,
        #[serde(rename = "Text")]
        text: String,
    },
    Group {
        #[serde(rename = "Topics")]
        topics: Vec<RelatedTopic>,
    },
}

fn map_results(answer: InstantAnswer, limit: usize) -> Vec<SearchResult> {
    let mut results = Vec::new();

    if !answer.abstract_text.is_empty() {
        results.push(SearchResult {
            title: if answer.heading.is_empty() {
                answer.abstract_url.clone()
            } else {
                answer.heading.clone()
            },
            link: answer.abstract_url.clone(),
            summary: answer.abstract_text.clone(),
        });
    }

    flatten_topics(&answer.related_topics, &mut results, limit);
    results.truncate(limit);
    results
}

fn flatten_topics(topics: &[RelatedTopic], out: &mut Vec<SearchResult>, limit: usize) {
    for topic in topics {
        if out.len() >= limit {
            return;
        }
        match topic {
            RelatedTopic::Topic { first_url, text } => {
                // Topic text reads "Title - description"; keep the full
                // text as the summary either way.
                let title = text
                    .split(" - ")
                    .next()
                    .unwrap_or(text)
                    .to_string();
                out.push(SearchResult {
                    title,
                    link: first_url.clone(),
                    summary: text.clone(),
                });
            }
            RelatedTopic::Group { topics } => {
                flatten_topics(topics, out, limit);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "Heading": "Rust (programming language)",
        "AbstractText": "Rust is a general-purpose programming language.",
        "AbstractURL": "https://en.wikipedia.org/wiki/Rust_(programming_language)",
        "RelatedTopics": [
            {
                "FirstURL": "https://duckduckgo.com/c/Rust_software",
                "Text": "Rust software - Software written in Rust."
            },
            {
                "Name": "Related",
                "Topics": [
                    {
                        "FirstURL": "https://duckduckgo.com/Cargo",
                        "Text": "Cargo - The Rust package manager."
                    }
                ]
            }
        ]
    }"#;

    #[test]
    fn test_abstract_maps_to_first_result() {
        let answer: InstantAnswer = serde_json::from_str(SAMPLE).unwrap();
        let results = map_results(answer, 3);

        assert_eq!(results.len(), 3);
        assert_eq!(results[0].title, "Rust (programming language)");
        assert_eq!(
            results[0].link,
            "https://en.wikipedia.org/wiki/Rust_(programming_language)"
        );
        assert_eq!(
            results[0].summary,
            "Rust is a general-purpose programming language."
        );
    }

    #[test]
    fn test_nested_topic_groups_are_flattened() {
        let answer: InstantAnswer = serde_json::from_str(SAMPLE).unwrap();
        let results = map_results(answer, 3);

        assert_eq!(results[1].title, "Rust software");
        assert_eq!(results[2].title, "Cargo");
        assert_eq!(results[2].link, "https://duckduckgo.com/Cargo");
        assert_eq!(results[2].summary, "Cargo - The Rust package manager.");
    }

    #[test]
    fn test_limit_cuts_off_topics() {
        let answer: InstantAnswer = serde_json::from_str(SAMPLE).unwrap();
        let results = map_results(answer, 2);
        assert_eq!(results.len(), 2);
    }

    #[test]
    fn test_empty_answer_maps_to_no_results() {
        let answer: InstantAnswer = serde_json::from_str(
            r#"{"Heading": "", "AbstractText": "", "AbstractURL": "", "RelatedTopics": []}"#,
        )
        .unwrap();
        assert!(map_results(answer, 3).is_empty());
    }

    #[test]
    fn test_missing_fields_default() {
        let answer: InstantAnswer = serde_json::from_str("{}").unwrap();
        assert!(map_results(answer, 3).is_empty());
    }

    #[test]
    fn test_provider_creation() {
        let provider = DuckDuckGoProvider::new().unwrap();
        assert_eq!(provider.name(), "duckduckgo");
    }
}
