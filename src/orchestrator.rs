//! Wires settings and credentials into a ready-to-use assistant.
//!
//! Owns the shared HTTP client, the tool registry, the reasoning engine and
//! the search aggregator, so front-ends only deal with questions and answers.

use crate::agent::{Query, QueryResolver, ReactEngine, ResolutionResult, Turn};
use crate::config::{Credentials, Prompts, Settings, TAVILY_API_KEY_VAR};
use crate::error::{Result, ScoutError};
use crate::http::build_client;
use crate::openai::create_client;
use crate::search::{SearchAggregate, SearchAggregator, TavilyClient, YouTubeClient};
use crate::tools::{RandomJokeTool, ToolRegistry, VideoSearchTool, WeatherTool, WebSearchTool};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, instrument};

/// The main entry point for answering questions and running searches.
pub struct Orchestrator {
    settings: Settings,
    resolver: QueryResolver,
    search: SearchAggregator,
}

/// Upstream search clients built from whatever keys are present.
struct SearchClients {
    web: Option<Arc<TavilyClient>>,
    video: Option<Arc<YouTubeClient>>,
}

impl SearchClients {
    fn new(settings: &Settings, credentials: &Credentials, http: &reqwest::Client) -> Self {
        Self {
            web: credentials.tavily_api_key.as_deref().map(|key| {
                Arc::new(TavilyClient::new(http.clone(), key, settings.search.clone()))
            }),
            video: credentials.youtube_api_key.as_deref().map(|key| {
                Arc::new(YouTubeClient::new(http.clone(), key, settings.video.clone()))
            }),
        }
    }

    fn aggregator(&self) -> Result<SearchAggregator> {
        let web = self.web.clone().ok_or_else(|| {
            ScoutError::Config(format!("{} not set", TAVILY_API_KEY_VAR))
        })?;
        Ok(SearchAggregator::new(web, self.video.clone()))
    }
}

impl Orchestrator {
    /// Build everything a resolution needs. Fails when the LLM or web search
    /// key is missing.
    pub fn new(settings: Settings, credentials: &Credentials) -> Result<Self> {
        let llm_key = credentials.require_llm()?;
        credentials.require_tavily()?;

        let prompts = Prompts::load(
            settings.prompts.custom_dir.as_deref(),
            Some(&settings.prompts.variables),
        )?;

        let http = build_client(settings.http_timeout())?;
        let clients = SearchClients::new(&settings, credentials, &http);
        let registry = Arc::new(build_registry(&settings, &clients, &http)?);

        let engine = ReactEngine::new(create_client(&settings.llm, llm_key)?, &settings.llm)
            .with_prompts(prompts);
        info!(
            "Using {} with tools {}",
            engine.model(),
            registry.tool_names()
        );

        let resolver = QueryResolver::new(Arc::new(engine), registry, settings.max_iterations())
            .with_timeout(settings.resolution_timeout());

        let search = clients.aggregator()?;

        Ok(Self {
            settings,
            resolver,
            search,
        })
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn tools(&self) -> &ToolRegistry {
        self.resolver.tools()
    }

    /// Answer one question, optionally continuing a conversation.
    #[instrument(skip(self, history))]
    pub async fn ask(&self, question: &str, history: &[Turn]) -> ResolutionResult {
        self.ask_with_cancel(question, history, CancellationToken::new())
            .await
    }

    /// Answer one question, giving up when `cancel` fires.
    pub async fn ask_with_cancel(
        &self,
        question: &str,
        history: &[Turn],
        cancel: CancellationToken,
    ) -> ResolutionResult {
        let query = Query::new(question).with_context(history.to_vec());
        self.resolver.resolve_with_cancel(&query, cancel).await
    }

    /// Run the combined web and video search.
    pub async fn search(&self, query: &str) -> SearchAggregate {
        self.search.search(query).await
    }
}

/// Build just the search aggregator. Needs the web and video search keys.
pub fn search_aggregator(settings: &Settings, credentials: &Credentials) -> Result<SearchAggregator> {
    credentials.require_tavily()?;
    credentials.require_youtube()?;

    let http = build_client(settings.http_timeout())?;
    SearchClients::new(settings, credentials, &http).aggregator()
}

/// Build the tool registry for whatever credentials are available.
pub fn tool_registry(settings: &Settings, credentials: &Credentials) -> Result<ToolRegistry> {
    let http = build_client(settings.http_timeout())?;
    let clients = SearchClients::new(settings, credentials, &http);
    build_registry(settings, &clients, &http)
}

fn build_registry(
    settings: &Settings,
    clients: &SearchClients,
    http: &reqwest::Client,
) -> Result<ToolRegistry> {
    let mut registry = ToolRegistry::new();

    if let Some(web) = &clients.web {
        registry.register(WebSearchTool::new(Arc::clone(web)))?;
    }
    if let Some(video) = &clients.video {
        registry.register(VideoSearchTool::new(Arc::clone(video)))?;
    }
    if settings.tools.weather {
        registry.register(WeatherTool::new(
            http.clone(),
            &settings.tools.geocoding_api_base,
            &settings.tools.forecast_api_base,
        ))?;
    }
    if settings.tools.joke {
        registry.register(RandomJokeTool::new(
            http.clone(),
            &settings.tools.joke_api_base,
        ))?;
    }

    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn credentials(vars: &[(&str, &str)]) -> Credentials {
        let vars: Vec<(String, String)> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Credentials::from_lookup(move |name| {
            vars.iter()
                .find(|(k, _)| k == name)
                .map(|(_, v)| v.clone())
        })
    }

    #[test]
    fn test_registry_follows_credentials_and_settings() {
        let settings = Settings::default();

        let all = credentials(&[("TAVILY_API_KEY", "tvly-x"), ("YOUTUBE_API_KEY", "yt-x")]);
        let registry = tool_registry(&settings, &all).unwrap();
        assert_eq!(
            registry.names(),
            vec!["web_search", "video_search", "weather", "random_joke"]
        );

        let web_only = credentials(&[("TAVILY_API_KEY", "tvly-x")]);
        let registry = tool_registry(&settings, &web_only).unwrap();
        assert_eq!(registry.names(), vec!["web_search", "weather", "random_joke"]);

        let mut settings = Settings::default();
        settings.tools.joke = false;
        settings.tools.weather = false;
        let registry = tool_registry(&settings, &web_only).unwrap();
        assert_eq!(registry.tool_names(), "[web_search]");
    }

    #[test]
    fn test_new_requires_llm_and_web_keys() {
        let err = Orchestrator::new(Settings::default(), &credentials(&[("TAVILY_API_KEY", "t")]))
            .err()
            .unwrap();
        assert!(matches!(err, ScoutError::Config(msg) if msg.contains("GOOGLE_API_KEY")));

        let err = Orchestrator::new(Settings::default(), &credentials(&[("GOOGLE_API_KEY", "g")]))
            .err()
            .unwrap();
        assert!(matches!(err, ScoutError::Config(msg) if msg.contains("TAVILY_API_KEY")));
    }

    #[test]
    fn test_new_without_youtube_key() {
        let orchestrator = Orchestrator::new(
            Settings::default(),
            &credentials(&[("GOOGLE_API_KEY", "g"), ("TAVILY_API_KEY", "t")]),
        )
        .unwrap();
        assert!(!orchestrator.tools().contains("video_search"));
        assert_eq!(orchestrator.settings().max_iterations(), 5);
    }

    #[test]
    fn test_search_aggregator_requires_both_keys() {
        let settings = Settings::default();
        assert!(search_aggregator(&settings, &credentials(&[("TAVILY_API_KEY", "t")])).is_err());
        assert!(search_aggregator(
            &settings,
            &credentials(&[("TAVILY_API_KEY", "t"), ("YOUTUBE_API_KEY", "y")])
        )
        .is_ok());
    }
}
