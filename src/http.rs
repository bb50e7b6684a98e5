//! Shared HTTP plumbing for the third-party APIs.

use crate::error::{Result, ScoutError};
use std::time::Duration;
use tracing::debug;

const USER_AGENT: &str = concat!("scout/", env!("CARGO_PKG_VERSION"));

/// Build a client with the given per-request timeout.
pub fn build_client(timeout: Duration) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .build()
        .map_err(|e| ScoutError::Config(format!("Failed to create HTTP client: {}", e)))
}

/// Send a request and decode its JSON body, naming `service` in any error.
///
/// Non-success statuses become errors carrying the upstream body, truncated.
pub async fn fetch_json(request: reqwest::RequestBuilder, service: &str) -> Result<serde_json::Value> {
    let response = request
        .send()
        .await
        .map_err(|e| ScoutError::upstream(service, e))?;

    let status = response.status();
    debug!("{} responded with {}", service, status);

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(ScoutError::upstream(
            service,
            format!("status {}: {}", status, truncate(body.trim(), 200)),
        ));
    }

    response
        .json::<serde_json::Value>()
        .await
        .map_err(|e| ScoutError::upstream(service, format!("invalid JSON response: {}", e)))
}

/// Join a configured base URL and a path without doubling slashes.
pub fn endpoint(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}

/// Truncate on a char boundary, appending "..." when shortened.
pub fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
