//! Registry of the tools available to a resolution.

use super::Tool;
use crate::error::{Result, ScoutError};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Tools keyed by unique name, kept in registration order.
///
/// Built once at startup and shared read-only behind an `Arc`.
#[derive(Default)]
pub struct ToolRegistry {
    tools: Vec<Arc<dyn Tool>>,
    index: HashMap<String, usize>,
}

impl ToolRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool. Fails if the name is taken.
    pub fn register<T: Tool + 'static>(&mut self, tool: T) -> Result<()> {
        self.register_arc(Arc::new(tool))
    }

    /// Register a shared tool. Fails if the name is taken.
    pub fn register_arc(&mut self, tool: Arc<dyn Tool>) -> Result<()> {
        let name = tool.name().to_string();
        if self.index.contains_key(&name) {
            return Err(ScoutError::DuplicateTool(name));
        }
        debug!("Registered tool: {}", name);
        self.index.insert(name, self.tools.len());
        self.tools.push(tool);
        Ok(())
    }

    /// Look up a tool by name.
    pub fn resolve(&self, name: &str) -> Result<Arc<dyn Tool>> {
        self.index
            .get(name)
            .map(|&i| Arc::clone(&self.tools[i]))
            .ok_or_else(|| ScoutError::UnknownTool {
                name: name.to_string(),
                available: self.tool_names(),
            })
    }

    /// Validate raw input for the named tool and invoke it.
    pub async fn invoke(&self, name: &str, raw_input: &str) -> Result<String> {
        let tool = self.resolve(name)?;
        let input = tool.input_schema().validate(raw_input)?;
        Ok(tool.invoke(input).await?)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Tool names in registration order.
    pub fn names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.name()).collect()
    }

    /// Names rendered as `[a, b, c]`.
    pub fn tool_names(&self) -> String {
        format!("[{}]", self.names().join(", "))
    }

    /// One line per tool: name, description and accepted input.
    pub fn describe(&self) -> String {
        self.tools
            .iter()
            .map(|t| {
                format!(
                    "{}: {} Input: {}",
                    t.name(),
                    t.description(),
                    t.input_schema().summary()
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Registered tools in order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn Tool>> {
        self.tools.iter()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}
