//! Tavily web search client.

use super::{string_at, WebResult, WebSearch};
use crate::config::SearchSettings;
use crate::error::Result;
use crate::http::{endpoint, fetch_json};
use serde_json::{json, Value};
use tracing::{debug, instrument};

const SERVICE: &str = "Tavily";
const MISSING: &str = "N/A";

/// Client for the Tavily search API.
pub struct TavilyClient {
    http: reqwest::Client,
    api_key: String,
    settings: SearchSettings,
}

impl TavilyClient {
    pub fn new(http: reqwest::Client, api_key: &str, settings: SearchSettings) -> Self {
        Self {
            http,
            api_key: api_key.to_string(),
            settings,
        }
    }

    /// Run a search with the configured result count.
    pub async fn search(&self, query: &str) -> Result<WebSearch> {
        self.search_with_limit(query, self.settings.max_results).await
    }

    /// Run a search returning at most `max_results` web results.
    #[instrument(skip(self), fields(service = SERVICE))]
    pub async fn search_with_limit(&self, query: &str, max_results: u32) -> Result<WebSearch> {
        let body = json!({
            "query": query,
            "search_depth": self.settings.search_depth,
            "max_results": max_results,
            "include_answer": self.settings.include_answer,
            "include_images": self.settings.include_images,
        });

        let request = self
            .http
            .post(endpoint(&self.settings.api_base, "search"))
            .bearer_auth(&self.api_key)
            .json(&body);

        let raw = fetch_json(request, SERVICE).await?;
        let search = normalize(&raw);
        debug!(
            "{} web results, {} images, answer: {}",
            search.results.len(),
            search.images.len(),
            search.answer.is_some()
        );
        Ok(search)
    }
}

/// Turn a raw Tavily response into a [`WebSearch`], tolerating missing keys.
pub fn normalize(raw: &Value) -> WebSearch {
    let results = raw
        .get("results")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .map(|item| WebResult {
                    title: string_at(item, &["title"]).unwrap_or(MISSING).to_string(),
                    link: string_at(item, &["url"]).unwrap_or(MISSING).to_string(),
                    snippet: string_at(item, &["content"]).unwrap_or(MISSING).to_string(),
                })
                .collect()
        })
        .unwrap_or_default();

    let images = raw
        .get("images")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|image| match image {
                    Value::String(url) => Some(url.clone()),
                    other => string_at(other, &["url"]).map(str::to_string),
                })
                .filter(|url| !url.trim().is_empty())
                .collect()
        })
        .unwrap_or_default();

    WebSearch {
        query: string_at(raw, &["query"]).map(str::to_string),
        answer: string_at(raw, &["answer"])
            .filter(|a| !a.trim().is_empty())
            .map(str::to_string),
        images,
        results,
    }
}
