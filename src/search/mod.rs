//! Web and video search, normalized into one result shape.
//!
//! Third-party responses are treated as untrusted: every optional key may be
//! missing, null or of the wrong type, and normalization degrades to empty
//! values instead of failing.

mod tavily;
mod youtube;

pub use tavily::TavilyClient;
pub use youtube::YouTubeClient;

pub mod normalize {
    //! Raw-response normalizers, exposed for callers holding upstream JSON.
    pub use super::tavily::normalize as web;
    pub use super::youtube::normalize as videos;
}

use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{instrument, warn};

/// One web page hit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WebResult {
    pub title: String,
    pub link: String,
    pub snippet: String,
}

/// One video hit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VideoResult {
    pub title: String,
    pub link: String,
    pub thumbnail_url: String,
}

/// Normalized web search response.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WebSearch {
    pub query: Option<String>,
    pub answer: Option<String>,
    pub images: Vec<String>,
    pub results: Vec<WebResult>,
}

/// Combined result of a web + video search.
///
/// A failing source leaves its fields empty and records the failure; the
/// other source's results are still returned.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SearchAggregate {
    pub query: String,
    pub answer: Option<String>,
    pub images: Vec<String>,
    pub web_results: Vec<WebResult>,
    pub video_results: Vec<VideoResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub web_error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_error: Option<String>,
}

impl SearchAggregate {
    /// Merge the outcome of each source.
    pub fn from_parts(
        query: &str,
        web: crate::Result<WebSearch>,
        videos: crate::Result<Vec<VideoResult>>,
    ) -> Self {
        let mut aggregate = Self {
            query: query.to_string(),
            ..Self::default()
        };

        match web {
            Ok(web) => {
                aggregate.answer = web.answer;
                aggregate.images = web.images;
                aggregate.web_results = web.results;
            }
            Err(e) => {
                warn!("Web search failed: {}", e);
                aggregate.web_error = Some(e.to_string());
            }
        }

        match videos {
            Ok(videos) => aggregate.video_results = videos,
            Err(e) => {
                warn!("Video search failed: {}", e);
                aggregate.video_error = Some(e.to_string());
            }
        }

        aggregate
    }

    /// True when neither source produced anything to show.
    pub fn is_empty(&self) -> bool {
        self.answer.is_none()
            && self.images.is_empty()
            && self.web_results.is_empty()
            && self.video_results.is_empty()
    }

    /// True when both sources failed.
    pub fn all_failed(&self) -> bool {
        self.web_error.is_some() && self.video_error.is_some()
    }
}

/// Runs web and video searches for one query.
pub struct SearchAggregator {
    web: Arc<TavilyClient>,
    video: Option<Arc<YouTubeClient>>,
}

impl SearchAggregator {
    pub fn new(web: Arc<TavilyClient>, video: Option<Arc<YouTubeClient>>) -> Self {
        Self { web, video }
    }

    /// Query both sources concurrently and merge the results.
    #[instrument(skip(self))]
    pub async fn search(&self, query: &str) -> SearchAggregate {
        let web = self.web.search(query);
        let videos = async {
            match &self.video {
                Some(client) => client.search(query).await,
                None => Err(crate::ScoutError::Config(
                    "video search is not configured (YOUTUBE_API_KEY missing)".to_string(),
                )),
            }
        };

        let (web, videos) = tokio::join!(web, videos);
        SearchAggregate::from_parts(query, web, videos)
    }
}

/// Follow `path` through nested objects and return the string found there.
pub(crate) fn string_at<'a>(value: &'a Value, path: &[&str]) -> Option<&'a str> {
    path.iter()
        .try_fold(value, |current, key| current.get(*key))
        .and_then(Value::as_str)
}
