//! YouTube Data API v3 video search client.

use super::{string_at, VideoResult};
use crate::config::VideoSettings;
use crate::error::Result;
use crate::http::{endpoint, fetch_json};
use serde_json::Value;
use tracing::{debug, instrument};

const SERVICE: &str = "YouTube";
const WATCH_URL: &str = "https://www.youtube.com/watch";

/// Client for the YouTube search endpoint.
pub struct YouTubeClient {
    http: reqwest::Client,
    api_key: String,
    settings: VideoSettings,
}

impl YouTubeClient {
    pub fn new(http: reqwest::Client, api_key: &str, settings: VideoSettings) -> Self {
        Self {
            http,
            api_key: api_key.to_string(),
            settings,
        }
    }

    /// Search with the configured result count.
    pub async fn search(&self, query: &str) -> Result<Vec<VideoResult>> {
        self.search_with_limit(query, self.settings.max_results).await
    }

    #[instrument(skip(self), fields(service = SERVICE))]
    pub async fn search_with_limit(&self, query: &str, max_results: u32) -> Result<Vec<VideoResult>> {
        let max_results = max_results.to_string();
        let request = self
            .http
            .get(endpoint(&self.settings.api_base, "search"))
            .query(&[
                ("part", "snippet"),
                ("q", query),
                ("type", "video"),
                ("maxResults", max_results.as_str()),
                ("fields", "items(id/videoId,snippet(title,thumbnails/default/url))"),
                ("key", self.api_key.as_str()),
            ]);

        let raw = fetch_json(request, SERVICE).await?;
        let videos = normalize(&raw);
        debug!("{} videos", videos.len());
        Ok(videos)
    }
}

/// Extract videos from a search response.
///
/// Items lacking a video id, a title or a default thumbnail are skipped.
pub fn normalize(raw: &Value) -> Vec<VideoResult> {
    raw.get("items")
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(video_from_item).collect())
        .unwrap_or_default()
}

fn video_from_item(item: &Value) -> Option<VideoResult> {
    let video_id = string_at(item, &["id", "videoId"])?;
    let title = string_at(item, &["snippet", "title"])?;
    let thumbnail_url = string_at(item, &["snippet", "thumbnails", "default", "url"])?;

    let link = url::Url::parse_with_params(WATCH_URL, &[("v", video_id)]).ok()?;

    Some(VideoResult {
        title: title.to_string(),
        link: link.to_string(),
        thumbnail_url: thumbnail_url.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::time::Duration;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn item(id: &str, title: &str) -> Value {
        json!({
            "id": {"videoId": id},
            "snippet": {"title": title, "thumbnails": {"default": {"url": format!("https://i.ytimg.com/vi/{}/default.jpg", id)}}}
        })
    }

    #[test]
    fn test_normalize_builds_watch_links() {
        let videos = normalize(&json!({"items": [item("abc123", "Python tutorial")]}));
        assert_eq!(videos.len(), 1);
        assert_eq!(videos[0].link, "https://www.youtube.com/watch?v=abc123");
        assert_eq!(videos[0].thumbnail_url, "https://i.ytimg.com/vi/abc123/default.jpg");
    }

    #[test]
    fn test_normalize_skips_incomplete_items() {
        let raw = json!({"items": [
            {"id": {"kind": "youtube#channel"}, "snippet": {"title": "A channel"}},
            {"id": {"videoId": "x"}, "snippet": {"title": "No thumbnail"}},
            item("ok1", "Kept")
        ]});
        let videos = normalize(&raw);
        assert_eq!(videos.len(), 1);
        assert_eq!(videos[0].title, "Kept");
    }

    #[test]
    fn test_normalize_missing_items() {
        assert!(normalize(&json!({})).is_empty());
        assert!(normalize(&json!({"items": "nope"})).is_empty());
    }

    #[tokio::test]
    async fn test_search_passes_query_parameters() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .and(query_param("q", "rust lifetimes"))
            .and(query_param("type", "video"))
            .and(query_param("maxResults", "4"))
            .and(query_param("key", "yt-key"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"items": [item("v1", "Lifetimes")]})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let settings = VideoSettings {
            api_base: server.uri(),
            ..VideoSettings::default()
        };
        let http = crate::http::build_client(Duration::from_secs(5)).unwrap();
        let client = YouTubeClient::new(http, "yt-key", settings);

        let videos = client.search_with_limit("rust lifetimes", 4).await.unwrap();
        assert_eq!(videos[0].title, "Lifetimes");
    }
}
