//! Video search tool backed by the YouTube Data API.

use super::{FieldSpec, FieldValue, InputSchema, Tool, ToolInput};
use crate::error::ToolError;
use crate::search::YouTubeClient;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;

const DEFAULT_RESULTS: i64 = 5;

/// Finds videos matching a query.
pub struct VideoSearchTool {
    client: Arc<YouTubeClient>,
    schema: InputSchema,
}

impl VideoSearchTool {
    pub fn new(client: Arc<YouTubeClient>) -> Self {
        Self {
            client,
            schema: InputSchema::new(vec![
                FieldSpec::text("query", "What to look for").required(),
                FieldSpec::integer("max_results", "Maximum number of videos")
                    .range(1, 50)
                    .with_default(FieldValue::Integer(DEFAULT_RESULTS)),
            ]),
        }
    }
}

#[async_trait]
impl Tool for VideoSearchTool {
    fn name(&self) -> &str {
        "video_search"
    }

    fn description(&self) -> &str {
        "Find YouTube videos about a topic. Use this when the user asks for videos, tutorials or talks."
    }

    fn input_schema(&self) -> &InputSchema {
        &self.schema
    }

    async fn invoke(&self, input: ToolInput) -> Result<String, ToolError> {
        let query = input.require_text("query")?;
        let max_results = input.integer("max_results").unwrap_or(DEFAULT_RESULTS) as u32;

        info!("Video search: {}", query);
        let videos = self
            .client
            .search_with_limit(query, max_results)
            .await
            .map_err(ToolError::execution)?;

        if videos.is_empty() {
            return Ok(format!("No videos found for \"{}\".", query));
        }

        let lines: Vec<String> = videos
            .iter()
            .enumerate()
            .map(|(i, v)| format!("{}. {} - {}", i + 1, v.title, v.link))
            .collect();

        Ok(format!("Found {} videos:\n{}", videos.len(), lines.join("\n")))
    }
}
