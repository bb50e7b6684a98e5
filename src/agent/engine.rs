//! The reasoning engine seam.

use super::types::{Query, ResolutionStep};
use crate::error::Result;
use crate::tools::ToolRegistry;
use async_trait::async_trait;

/// Everything an engine may look at when deciding what to do next.
#[derive(Clone, Copy)]
pub struct ThinkContext<'a> {
    pub query: &'a Query,
    pub steps: &'a [ResolutionStep],
    pub tools: &'a ToolRegistry,
}

/// What the engine decided.
#[derive(Debug, Clone, PartialEq)]
pub enum NextStep {
    /// Call a tool with raw input.
    Act {
        thought: String,
        action: String,
        action_input: String,
    },
    /// Stop and answer.
    Finish {
        thought: String,
        final_answer: String,
    },
}

/// Produces the next step of a resolution.
///
/// Returning `ScoutError::OutputParse` means the engine produced something it
/// could not interpret; the resolver feeds that back as an observation. Any
/// other error ends the resolution.
#[async_trait]
pub trait ReasoningEngine: Send + Sync {
    async fn think(&self, ctx: ThinkContext<'_>) -> Result<NextStep>;
}
