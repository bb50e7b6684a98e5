//! Configuration module for Scout.
//!
//! Handles loading application settings, prompt templates and API credentials.

mod credentials;
mod prompts;
mod settings;

pub use credentials::{
    mask, Credentials, LLM_API_KEY_FALLBACK_VAR, LLM_API_KEY_VAR, TAVILY_API_KEY_VAR,
    YOUTUBE_API_KEY_VAR,
};
pub use prompts::{Prompts, ReactPrompts};
pub use settings::{
    AgentSettings, GeneralSettings, LlmSettings, MemorySettings, PromptSettings, SearchSettings,
    ServerSettings, Settings, ToolSettings, VideoSettings,
};
