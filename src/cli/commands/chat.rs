//! Interactive chat command with conversation memory.

use super::ensure_ready;
use crate::agent::{ConversationBuffer, ConversationMemory, Role, Termination};
use crate::cli::preflight::Operation;
use crate::cli::Output;
use crate::config::{Credentials, Settings};
use crate::orchestrator::Orchestrator;
use anyhow::Result;
use console::style;
use std::io::{self, BufRead, Write};

/// Run the interactive chat command.
pub async fn run_chat(model: Option<String>, mut settings: Settings) -> Result<()> {
    let credentials = Credentials::from_env();
    ensure_ready(Operation::Ask, &credentials)?;

    if let Some(model) = model {
        settings.llm.model = model;
    }
    settings.validate()?;

    let mut memory = ConversationBuffer::new(settings.memory.max_turns);
    let orchestrator = Orchestrator::new(settings, &credentials)?;

    println!("\n{}", style("Scout Chat").bold().cyan());
    println!(
        "{}",
        style(format!("Tools: {}", orchestrator.tools().tool_names())).dim()
    );
    println!(
        "{}\n",
        style("Type your questions, or 'exit' to quit. Use 'clear' to reset conversation.").dim()
    );

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("{} ", style("You:").green().bold());
        stdout.flush()?;

        let mut input = String::new();
        if stdin.lock().read_line(&mut input)? == 0 {
            break;
        }

        let input = input.trim();

        if input.is_empty() {
            continue;
        }

        if input.eq_ignore_ascii_case("exit") || input.eq_ignore_ascii_case("quit") {
            Output::info("Goodbye!");
            break;
        }

        if input.eq_ignore_ascii_case("clear") {
            memory.clear();
            Output::info("Conversation history cleared.");
            continue;
        }

        let spinner = Output::spinner("Thinking...");
        let result = orchestrator.ask(input, &memory.turns()).await;
        spinner.finish_and_clear();

        for step in result.steps.iter().filter(|s| s.action.is_some()) {
            let action = step.action.as_deref().unwrap_or_default();
            println!("{}", style(format!("  [{}]", action)).dim());
        }

        println!("\n{} {}\n", style("Scout:").cyan().bold(), result.final_answer);
        Output::termination(result.terminated);

        if result.terminated != Termination::Error {
            memory.append_turn(Role::User, input);
            memory.append_turn(Role::Assistant, &result.final_answer);
        }
    }

    Ok(())
}
