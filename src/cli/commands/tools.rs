//! Tools command - list what the assistant can call.

use crate::cli::Output;
use crate::config::{Credentials, Settings, TAVILY_API_KEY_VAR, YOUTUBE_API_KEY_VAR};
use crate::orchestrator::tool_registry;
use anyhow::Result;
use console::style;

/// Run the tools command.
pub fn run_tools(settings: &Settings) -> Result<()> {
    let credentials = Credentials::from_env();
    let registry = tool_registry(settings, &credentials)?;

    Output::header("Available Tools");
    println!();

    for tool in registry.iter() {
        println!("  {} {}", style("*").cyan(), style(tool.name()).bold());
        println!("    {}", tool.description());
        println!("    {} {}", style("input:").dim(), tool.input_schema().summary());
    }

    if credentials.tavily_api_key.is_none() {
        Output::warning(&format!("web_search unavailable: {} not set", TAVILY_API_KEY_VAR));
    }
    if credentials.youtube_api_key.is_none() {
        Output::warning(&format!("video_search unavailable: {} not set", YOUTUBE_API_KEY_VAR));
    }

    Ok(())
}
