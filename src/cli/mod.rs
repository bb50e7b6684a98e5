//! CLI module for Scout.

pub mod commands;
mod output;
pub mod preflight;

pub use output::Output;

use crate::config::Settings;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Scout - a search assistant that thinks, looks things up, and answers
///
/// Answers questions by letting a language model pick from web search,
/// video search, weather and joke tools in a bounded reasoning loop.
#[derive(Parser, Debug)]
#[command(name = "scout")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check credentials and configuration
    Doctor,

    /// Ask a single question
    Ask {
        /// The question to ask
        question: String,

        /// LLM model to use
        #[arg(short, long)]
        model: Option<String>,

        /// Upper bound on reasoning iterations
        #[arg(short = 'i', long)]
        max_iterations: Option<i64>,

        /// Print every thought, action and observation
        #[arg(short, long)]
        steps: bool,
    },

    /// Start an interactive chat session
    Chat {
        /// LLM model to use
        #[arg(short, long)]
        model: Option<String>,
    },

    /// Search the web and YouTube at once
    Search {
        /// Search query
        query: String,

        /// Which sections to show
        #[arg(long, value_enum, default_value_t = SearchSection::All)]
        only: SearchSection,

        /// Maximum results per source
        #[arg(short = 'n', long)]
        max_results: Option<u32>,
    },

    /// List the tools available to the assistant
    Tools,

    /// Start HTTP API server for integration with other systems
    Serve {
        /// Host to bind to (defaults to server.host)
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to (defaults to server.port)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

impl Cli {
    /// Filter directive for the crate's logs. Each `-v` raises the level;
    /// without one the configured level applies.
    pub fn log_filter(&self, configured: &str) -> String {
        let level = match self.verbose {
            0 => configured,
            1 => "info",
            2 => "debug",
            _ => "trace",
        };
        format!("scout={}", level)
    }

    /// The configuration file this invocation reads and edits.
    pub fn config_path(&self) -> PathBuf {
        match &self.config {
            Some(path) => PathBuf::from(shellexpand::tilde(path).to_string()),
            None => Settings::default_config_path(),
        }
    }
}

/// Result sections of `scout search`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SearchSection {
    All,
    Web,
    Images,
    Videos,
}

impl SearchSection {
    pub fn shows(&self, section: SearchSection) -> bool {
        *self == SearchSection::All || *self == section
    }
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Open configuration file in editor
    Edit,

    /// Show configuration file path
    Path,
}
