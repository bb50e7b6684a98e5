//! Configuration settings for Scout.

use crate::error::{Result, ScoutError};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub llm: LlmSettings,
    pub agent: AgentSettings,
    pub search: SearchSettings,
    pub video: VideoSettings,
    pub tools: ToolSettings,
    pub memory: MemorySettings,
    pub server: ServerSettings,
    pub prompts: PromptSettings,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Log level (trace, debug, info, warn, error). Used when neither `-v`
    /// nor `RUST_LOG` is given.
    pub log_level: String,
    /// Timeout for each upstream HTTP request, in seconds.
    pub http_timeout_secs: u64,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            log_level: "warn".to_string(),
            http_timeout_secs: 30,
        }
    }
}

/// Settings for the chat completion endpoint driving the reasoning loop.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmSettings {
    /// Base URL of an OpenAI-compatible API.
    pub api_base: String,
    /// Model identifier.
    pub model: String,
    /// Sampling temperature (0.0-2.0).
    pub temperature: f32,
    /// Timeout for a single completion request, in seconds.
    pub request_timeout_secs: u64,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            api_base: "https://generativelanguage.googleapis.com/v1beta/openai".to_string(),
            model: "gemini-2.0-flash".to_string(),
            temperature: 0.8,
            request_timeout_secs: 120,
        }
    }
}

/// Settings for the query resolver.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentSettings {
    /// Upper bound on think/act/observe iterations per query.
    pub max_iterations: i64,
    /// Bound on a whole resolution, in seconds. 0 disables the timeout.
    pub timeout_secs: u64,
}

impl Default for AgentSettings {
    fn default() -> Self {
        Self {
            max_iterations: 5,
            timeout_secs: 180,
        }
    }
}

/// Web search (Tavily) settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    /// Base URL of the Tavily API.
    pub api_base: String,
    /// Search depth ("basic" or "advanced").
    pub search_depth: String,
    /// Maximum number of web results.
    pub max_results: u32,
    /// Ask the upstream API for a synthesized answer.
    pub include_answer: bool,
    /// Ask the upstream API for image results.
    pub include_images: bool,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            api_base: "https://api.tavily.com".to_string(),
            search_depth: "advanced".to_string(),
            max_results: 10,
            include_answer: true,
            include_images: true,
        }
    }
}

/// Video search (YouTube Data API) settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VideoSettings {
    /// Base URL of the YouTube Data API v3.
    pub api_base: String,
    /// Maximum number of video results.
    pub max_results: u32,
}

impl Default for VideoSettings {
    fn default() -> Self {
        Self {
            api_base: "https://www.googleapis.com/youtube/v3".to_string(),
            max_results: 10,
        }
    }
}

/// Which keyless tools the agent gets, and where they talk to.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolSettings {
    /// Register the weather tool.
    pub weather: bool,
    /// Register the random joke tool.
    pub joke: bool,
    /// Base URL of the Open-Meteo geocoding API.
    pub geocoding_api_base: String,
    /// Base URL of the Open-Meteo forecast API.
    pub forecast_api_base: String,
    /// Base URL of JokeAPI.
    pub joke_api_base: String,
}

impl Default for ToolSettings {
    fn default() -> Self {
        Self {
            weather: true,
            joke: true,
            geocoding_api_base: "https://geocoding-api.open-meteo.com/v1".to_string(),
            forecast_api_base: "https://api.open-meteo.com/v1".to_string(),
            joke_api_base: "https://v2.jokeapi.dev".to_string(),
        }
    }
}

/// Conversation memory settings for chat sessions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MemorySettings {
    /// Number of turns kept in a chat session's buffer.
    pub max_turns: usize,
}

impl Default for MemorySettings {
    fn default() -> Self {
        Self { max_turns: 20 }
    }
}

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

/// Prompt customization settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct PromptSettings {
    /// Directory for custom prompts (overrides defaults).
    pub custom_dir: Option<String>,
    /// Custom variables available in all prompts as {{variable_name}}.
    pub variables: std::collections::HashMap<String, String>,
}

impl Settings {
    /// Load settings from the default configuration file.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load settings from a specific path, or default location if None.
    pub fn load_from(path: Option<&PathBuf>) -> Result<Self> {
        let config_path = match path {
            Some(p) => p.clone(),
            None => Self::default_config_path(),
        };

        let settings = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            toml::from_str(&content)?
        } else {
            Settings::default()
        };

        settings.validate()?;
        Ok(settings)
    }

    /// Reject values the resolver and LLM client cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.agent.max_iterations <= 0 {
            return Err(ScoutError::Config(format!(
                "agent.max_iterations must be greater than 0 (got {})",
                self.agent.max_iterations
            )));
        }
        if !(0.0..=2.0).contains(&self.llm.temperature) {
            return Err(ScoutError::Config(format!(
                "llm.temperature must be between 0.0 and 2.0 (got {})",
                self.llm.temperature
            )));
        }
        if !LOG_LEVELS.contains(&self.general.log_level.as_str()) {
            return Err(ScoutError::Config(format!(
                "general.log_level must be one of {} (got {:?})",
                LOG_LEVELS.join(", "),
                self.general.log_level
            )));
        }
        if self.llm.model.trim().is_empty() {
            return Err(ScoutError::Config("llm.model must not be empty".to_string()));
        }
        Ok(())
    }

    /// Save settings to a specific path.
    pub fn save_to(&self, path: &PathBuf) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| ScoutError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("scout")
            .join("config.toml")
    }

    /// Iteration bound as the resolver takes it. Only meaningful after `validate`.
    pub fn max_iterations(&self) -> usize {
        usize::try_from(self.agent.max_iterations).unwrap_or(0)
    }

    /// Whole-resolution timeout, if enabled.
    pub fn resolution_timeout(&self) -> Option<std::time::Duration> {
        (self.agent.timeout_secs > 0)
            .then(|| std::time::Duration::from_secs(self.agent.timeout_secs))
    }

    /// Per-request timeout for tool HTTP clients.
    pub fn http_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.general.http_timeout_secs)
    }
}
