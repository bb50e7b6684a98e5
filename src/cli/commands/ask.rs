//! Ask command implementation.

use super::ensure_ready;
use crate::agent::Termination;
use crate::cli::preflight::Operation;
use crate::cli::Output;
use crate::config::{Credentials, Settings};
use crate::orchestrator::Orchestrator;
use anyhow::Result;
use tokio_util::sync::CancellationToken;

/// Run the ask command.
pub async fn run_ask(
    question: &str,
    model: Option<String>,
    max_iterations: Option<i64>,
    show_steps: bool,
    mut settings: Settings,
) -> Result<()> {
    let credentials = Credentials::from_env();
    ensure_ready(Operation::Ask, &credentials)?;

    if let Some(model) = model {
        settings.llm.model = model;
    }
    if let Some(max) = max_iterations {
        settings.agent.max_iterations = max;
    }
    settings.validate()?;

    let orchestrator = Orchestrator::new(settings, &credentials)?;

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_interrupt.cancel();
        }
    });

    let spinner = Output::spinner("Thinking...");
    let result = orchestrator.ask_with_cancel(question, &[], cancel).await;
    spinner.finish_and_clear();

    if show_steps {
        Output::header("Steps");
        for (i, step) in result.steps.iter().enumerate() {
            Output::step(i + 1, step);
        }
        println!();
    }

    println!("\n{}\n", result.final_answer);
    Output::termination(result.terminated);

    if result.terminated == Termination::Error {
        anyhow::bail!("{}", result.final_answer);
    }

    Ok(())
}
