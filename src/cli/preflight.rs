//! Pre-flight checks before serving queries.
//!
//! Validates that required credentials are available before starting
//! operations that would otherwise fail on the first upstream call.

use crate::config::Credentials;
use crate::error::Result;

/// Requirements for different operations.
#[derive(Debug, Clone, Copy)]
pub enum Operation {
    /// Asking, chatting and serving need the LLM and web search keys.
    Ask,
    /// Search needs the web and video search keys.
    Search,
}

/// Run pre-flight checks for the given operation.
///
/// Returns Ok(()) if all checks pass, or an error naming the missing variable.
pub fn check(operation: Operation, credentials: &Credentials) -> Result<()> {
    match operation {
        Operation::Ask => {
            credentials.require_llm()?;
            credentials.require_tavily()?;
        }
        Operation::Search => {
            credentials.require_tavily()?;
            credentials.require_youtube()?;
        }
    }
    Ok(())
}
