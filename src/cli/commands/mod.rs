//! CLI command implementations.

mod ask;
mod chat;
mod config;
mod doctor;
mod search;
mod serve;
mod tools;

pub use ask::run_ask;
pub use chat::run_chat;
pub use config::run_config;
pub use doctor::run_doctor;
pub use search::run_search;
pub use serve::run_serve;
pub use tools::run_tools;

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Credentials;

/// Run pre-flight checks, pointing at `scout doctor` on failure.
fn ensure_ready(operation: Operation, credentials: &Credentials) -> anyhow::Result<()> {
    if let Err(e) = preflight::check(operation, credentials) {
        Output::error(&format!("{}", e));
        Output::info("Run 'scout doctor' for detailed diagnostics.");
        return Err(e.into());
    }
    Ok(())
}
