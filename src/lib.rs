//! Scout - a search assistant with a bounded reasoning loop
//!
//! Scout answers questions by letting a language model think, pick a tool,
//! read what the tool returned and repeat, until it can answer or runs out
//! of iterations.
//!
//! # Overview
//!
//! Scout allows you to:
//! - Ask questions answered with live web search, YouTube search, weather and jokes
//! - Hold a conversation whose earlier turns inform later answers
//! - Run a combined web + video search without the reasoning loop
//! - Expose all of the above over a small HTTP API
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - `config` - Settings, credentials and prompt templates
//! - `tools` - The `Tool` trait, typed input schemas and the registry
//! - `agent` - Reasoning engines and the query resolver loop
//! - `search` - Web (Tavily) and video (YouTube) clients plus aggregation
//! - `orchestrator` - Wires everything together for front-ends
//!
//! # Example
//!
//! ```rust,no_run
//! use scout::config::{Credentials, Settings};
//! use scout::orchestrator::Orchestrator;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let orchestrator = Orchestrator::new(settings, &Credentials::from_env())?;
//!
//!     let result = orchestrator.ask("What's the weather in Oslo?", &[]).await;
//!     println!("{} ({})", result.final_answer, result.terminated);
//!
//!     Ok(())
//! }
//! ```

pub mod agent;
pub mod cli;
pub mod config;
pub mod error;
pub mod http;
pub mod openai;
pub mod orchestrator;
pub mod search;
pub mod tools;

pub use error::{Result, ScoutError};
