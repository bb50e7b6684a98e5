//! Error types for Scout.

use thiserror::Error;

/// Library-level error type for Scout operations.
#[derive(Error, Debug)]
pub enum ScoutError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Tool '{0}' is already registered")]
    DuplicateTool(String),

    #[error("{name} is not a valid tool, try one of {available}.")]
    UnknownTool { name: String, available: String },

    #[error(transparent)]
    Tool(#[from] ToolError),

    #[error("Invalid format: {detail}")]
    OutputParse { detail: String, output: String },

    #[error("Reasoning engine error: {0}")]
    Reasoning(String),

    #[error("LLM API error: {0}")]
    OpenAI(String),

    #[error("{service} request failed: {message}")]
    Upstream { service: String, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Errors raised while validating input for, or invoking, a tool.
///
/// These never escape a resolution; the resolver turns them into observations.
#[derive(Error, Debug)]
pub enum ToolError {
    #[error("Invalid tool input: {0}")]
    InvalidInput(String),

    #[error("{0}")]
    Execution(String),
}

impl ScoutError {
    /// Failure talking to a third-party API.
    pub fn upstream(service: &str, message: impl std::fmt::Display) -> Self {
        ScoutError::Upstream {
            service: service.to_string(),
            message: message.to_string(),
        }
    }
}

impl ToolError {
    /// Wrap any failure as a tool execution error.
    pub fn execution(err: impl std::fmt::Display) -> Self {
        ToolError::Execution(err.to_string())
    }
}

/// Result type alias for Scout operations.
pub type Result<T> = std::result::Result<T, ScoutError>;
