//! Tools the reasoning loop can call.
//!
//! A tool has a unique name, a description shown to the model, a declared
//! input schema, and an async `invoke` returning a text observation.

mod joke;
mod registry;
mod schema;
mod video_search;
mod weather;
mod web_search;

pub use joke::RandomJokeTool;
pub use registry::ToolRegistry;
pub use schema::{FieldKind, FieldSpec, FieldValue, InputSchema, ToolInput};
pub use video_search::VideoSearchTool;
pub use weather::WeatherTool;
pub use web_search::WebSearchTool;

use crate::error::ToolError;
use async_trait::async_trait;

/// A named capability the reasoning engine can invoke.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Unique name within a registry.
    fn name(&self) -> &str;

    /// Human-readable description for the model.
    fn description(&self) -> &str;

    /// Fields this tool accepts.
    fn input_schema(&self) -> &InputSchema;

    /// Run the tool on validated input.
    async fn invoke(&self, input: ToolInput) -> Result<String, ToolError>;
}
