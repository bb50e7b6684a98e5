//! Chat completion client for any OpenAI-compatible endpoint.

use crate::config::LlmSettings;
use crate::error::{Result, ScoutError};
use async_openai::{config::OpenAIConfig, Client};
use std::time::Duration;

/// Create a client for the configured endpoint.
pub fn create_client(settings: &LlmSettings, api_key: &str) -> Result<Client<OpenAIConfig>> {
    create_client_with_timeout(
        settings,
        api_key,
        Duration::from_secs(settings.request_timeout_secs),
    )
}

/// Create a client with a custom request timeout.
pub fn create_client_with_timeout(
    settings: &LlmSettings,
    api_key: &str,
    timeout: Duration,
) -> Result<Client<OpenAIConfig>> {
    let http_client = reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| ScoutError::Config(format!("Failed to create HTTP client: {}", e)))?;

    let config = OpenAIConfig::new()
        .with_api_key(api_key)
        .with_api_base(settings.api_base.trim_end_matches('/'));

    Ok(Client::with_config(config).with_http_client(http_client))
}
