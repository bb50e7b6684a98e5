//! Random joke tool backed by JokeAPI.

use super::{InputSchema, Tool, ToolInput};
use crate::error::ToolError;
use crate::http::{endpoint, fetch_json};
use async_trait::async_trait;
use serde_json::Value;

const SERVICE: &str = "JokeAPI";
const BLACKLIST: &str = "nsfw,religious,political,racist,sexist";

/// Fetches a random, safe-for-work joke.
pub struct RandomJokeTool {
    http: reqwest::Client,
    api_base: String,
    schema: InputSchema,
}

impl RandomJokeTool {
    pub fn new(http: reqwest::Client, api_base: &str) -> Self {
        Self {
            http,
            api_base: api_base.to_string(),
            schema: InputSchema::empty(),
        }
    }
}

#[async_trait]
impl Tool for RandomJokeTool {
    fn name(&self) -> &str {
        "random_joke"
    }

    fn description(&self) -> &str {
        "Get a random joke. Use this when the user wants a laugh or to lighten the mood."
    }

    fn input_schema(&self) -> &InputSchema {
        &self.schema
    }

    async fn invoke(&self, _input: ToolInput) -> Result<String, ToolError> {
        let request = self
            .http
            .get(endpoint(&self.api_base, "joke/Any"))
            .query(&[("blacklistFlags", BLACKLIST)]);

        let raw = fetch_json(request, SERVICE)
            .await
            .map_err(ToolError::execution)?;

        joke_text(&raw)
    }
}

/// Flatten single and two-part jokes into one line.
fn joke_text(raw: &Value) -> Result<String, ToolError> {
    if raw.get("error").and_then(Value::as_bool).unwrap_or(false) {
        let message = raw
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("unknown error");
        return Err(ToolError::Execution(format!("{} error: {}", SERVICE, message)));
    }

    let text = match raw.get("type").and_then(Value::as_str) {
        Some("single") => raw.get("joke").and_then(Value::as_str).map(str::to_string),
        _ => {
            let setup = raw.get("setup").and_then(Value::as_str);
            let delivery = raw.get("delivery").and_then(Value::as_str);
            match (setup, delivery) {
                (Some(s), Some(d)) => Some(format!("{} {}", s, d)),
                _ => None,
            }
        }
    };

    text.filter(|t| !t.trim().is_empty())
        .ok_or_else(|| ToolError::Execution(format!("{} returned no joke", SERVICE)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::time::Duration;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_single_and_twopart() {
        let single = json!({"error": false, "type": "single", "joke": "I told a UDP joke. You might not get it."});
        assert_eq!(joke_text(&single).unwrap(), "I told a UDP joke. You might not get it.");

        let twopart = json!({"type": "twopart", "setup": "Why do programmers prefer dark mode?", "delivery": "Light attracts bugs."});
        assert_eq!(
            joke_text(&twopart).unwrap(),
            "Why do programmers prefer dark mode? Light attracts bugs."
        );
    }

    #[test]
    fn test_api_error_and_missing_fields() {
        let err = joke_text(&json!({"error": true, "message": "No matching joke found"})).unwrap_err();
        assert!(err.to_string().contains("No matching joke found"));

        assert!(joke_text(&json!({"type": "twopart", "setup": "Knock knock"})).is_err());
    }

    #[tokio::test]
    async fn test_invoke_sends_blacklist() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/joke/Any"))
            .and(query_param("blacklistFlags", BLACKLIST))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"type": "single", "joke": "There are 10 kinds of people."})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let http = crate::http::build_client(Duration::from_secs(5)).unwrap();
        let tool = RandomJokeTool::new(http, &server.uri());
        let input = tool.input_schema().validate("make me laugh").unwrap();
        assert_eq!(tool.invoke(input).await.unwrap(), "There are 10 kinds of people.");
    }
}
