//! Web search tool backed by Tavily.

use super::{FieldSpec, FieldValue, InputSchema, Tool, ToolInput};
use crate::error::ToolError;
use crate::search::{TavilyClient, WebSearch};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;

const DEFAULT_RESULTS: i64 = 5;
const SNIPPET_CHARS: usize = 400;

/// Searches the web and reports the direct answer plus top results.
pub struct WebSearchTool {
    client: Arc<TavilyClient>,
    schema: InputSchema,
}

impl WebSearchTool {
    pub fn new(client: Arc<TavilyClient>) -> Self {
        Self {
            client,
            schema: InputSchema::new(vec![
                FieldSpec::text("query", "The search query").required(),
                FieldSpec::integer("max_results", "Maximum number of results")
                    .range(1, 20)
                    .with_default(FieldValue::Integer(DEFAULT_RESULTS)),
            ]),
        }
    }
}

#[async_trait]
impl Tool for WebSearchTool {
    fn name(&self) -> &str {
        "web_search"
    }

    fn description(&self) -> &str {
        "Search the web for current information. Use this for facts, news, or anything you are unsure about."
    }

    fn input_schema(&self) -> &InputSchema {
        &self.schema
    }

    async fn invoke(&self, input: ToolInput) -> Result<String, ToolError> {
        let query = input.require_text("query")?;
        let max_results = input.integer("max_results").unwrap_or(DEFAULT_RESULTS) as u32;

        info!("Web search: {}", query);
        let search = self
            .client
            .search_with_limit(query, max_results)
            .await
            .map_err(ToolError::execution)?;

        Ok(format_observation(query, &search))
    }
}

fn format_observation(query: &str, search: &WebSearch) -> String {
    if search.answer.is_none() && search.results.is_empty() {
        return format!("No results found for \"{}\".", query);
    }

    let mut output = String::new();
    if let Some(answer) = &search.answer {
        output.push_str(&format!("Answer: {}\n\n", answer));
    }

    if !search.results.is_empty() {
        output.push_str(&format!("Found {} results:\n\n", search.results.len()));
        for (i, result) in search.results.iter().enumerate() {
            output.push_str(&format!(
                "{}. {}\n   {}\n   {}\n\n",
                i + 1,
                result.title,
                result.link,
                crate::http::truncate(&result.snippet, SNIPPET_CHARS)
            ));
        }
    }

    output.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SearchSettings;
    use crate::search::WebResult;
    use serde_json::json;
    use std::time::Duration;
    use wiremock::matchers::{body_partial_json, method};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_format_observation_with_answer_and_results() {
        let search = WebSearch {
            answer: Some("Paris".to_string()),
            results: vec![WebResult {
                title: "France".to_string(),
                link: "https://example.com".to_string(),
                snippet: "Capital city.".to_string(),
            }],
            ..WebSearch::default()
        };
        let text = format_observation("capital of France", &search);
        assert!(text.starts_with("Answer: Paris"));
        assert!(text.contains("1. France\n   https://example.com\n   Capital city."));
    }

    #[test]
    fn test_format_observation_empty() {
        let text = format_observation("zzz", &WebSearch::default());
        assert_eq!(text, "No results found for \"zzz\".");
    }

    #[tokio::test]
    async fn test_invoke_uses_requested_limit() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_partial_json(json!({"query": "tokio", "max_results": 2})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "results": [{"title": "Tokio", "url": "https://tokio.rs", "content": "Runtime"}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let http = crate::http::build_client(Duration::from_secs(5)).unwrap();
        let client = TavilyClient::new(
            http,
            "k",
            SearchSettings {
                api_base: server.uri(),
                ..SearchSettings::default()
            },
        );
        let tool = WebSearchTool::new(Arc::new(client));

        let input = tool
            .input_schema()
            .validate(r#"{"query": "tokio", "max_results": 2}"#)
            .unwrap();
        let out = tool.invoke(input).await.unwrap();
        assert!(out.contains("https://tokio.rs"));
    }

    #[tokio::test]
    async fn test_invoke_maps_upstream_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429))
            .mount(&server)
            .await;

        let http = crate::http::build_client(Duration::from_secs(5)).unwrap();
        let client = TavilyClient::new(
            http,
            "k",
            SearchSettings {
                api_base: server.uri(),
                ..SearchSettings::default()
            },
        );
        let tool = WebSearchTool::new(Arc::new(client));

        let input = tool.input_schema().validate("anything").unwrap();
        let err = tool.invoke(input).await.unwrap_err();
        assert!(matches!(err, ToolError::Execution(ref m) if m.contains("429")));
    }
}
