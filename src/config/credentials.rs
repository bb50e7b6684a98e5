//! API credentials, read from the environment only.

use crate::error::{Result, ScoutError};

/// Environment variable holding the LLM API key.
pub const LLM_API_KEY_VAR: &str = "GOOGLE_API_KEY";
/// Fallback variable for OpenAI-hosted models.
pub const LLM_API_KEY_FALLBACK_VAR: &str = "OPENAI_API_KEY";
/// Environment variable holding the Tavily API key.
pub const TAVILY_API_KEY_VAR: &str = "TAVILY_API_KEY";
/// Environment variable holding the YouTube Data API key.
pub const YOUTUBE_API_KEY_VAR: &str = "YOUTUBE_API_KEY";

/// Credentials for the upstream APIs. Empty values count as absent.
#[derive(Clone, Default)]
pub struct Credentials {
    pub llm_api_key: Option<String>,
    pub tavily_api_key: Option<String>,
    pub youtube_api_key: Option<String>,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("llm_api_key", &self.llm_api_key.as_deref().map(mask))
            .field("tavily_api_key", &self.tavily_api_key.as_deref().map(mask))
            .field("youtube_api_key", &self.youtube_api_key.as_deref().map(mask))
            .finish()
    }
}

impl Credentials {
    /// Read credentials from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read credentials through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        Self {
            llm_api_key: get(LLM_API_KEY_VAR).or_else(|| get(LLM_API_KEY_FALLBACK_VAR)),
            tavily_api_key: get(TAVILY_API_KEY_VAR),
            youtube_api_key: get(YOUTUBE_API_KEY_VAR),
        }
    }

    pub fn require_llm(&self) -> Result<&str> {
        required(self.llm_api_key.as_deref(), LLM_API_KEY_VAR)
    }

    pub fn require_tavily(&self) -> Result<&str> {
        required(self.tavily_api_key.as_deref(), TAVILY_API_KEY_VAR)
    }

    pub fn require_youtube(&self) -> Result<&str> {
        required(self.youtube_api_key.as_deref(), YOUTUBE_API_KEY_VAR)
    }
}

fn required<'a>(value: Option<&'a str>, var: &str) -> Result<&'a str> {
    value.ok_or_else(|| {
        ScoutError::Config(format!(
            "{} not set. Add it to your environment or a .env file.",
            var
        ))
    })
}

/// Mask a secret for display, keeping a short prefix and suffix.
pub fn mask(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() <= 12 {
        return "****".to_string();
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}...{}", head, tail)
}
