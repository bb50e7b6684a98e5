//! CLI output formatting utilities.

use crate::agent::{ResolutionStep, Termination};
use crate::search::{VideoResult, WebResult};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

/// Output helper for CLI formatting.
pub struct Output;

impl Output {
    /// Print an info message.
    pub fn info(msg: &str) {
        println!("{} {}", style(">>").cyan().bold(), msg);
    }

    /// Print a success message.
    pub fn success(msg: &str) {
        println!("{} {}", style(">>").green().bold(), msg);
    }

    /// Print a warning message.
    pub fn warning(msg: &str) {
        eprintln!("{} {}", style(">>").yellow().bold(), msg);
    }

    /// Print an error message.
    pub fn error(msg: &str) {
        eprintln!("{} {}", style(">>").red().bold(), msg);
    }

    /// Print a header.
    pub fn header(msg: &str) {
        println!("\n{}", style(msg).bold().underlined());
    }

    /// Print a key-value pair.
    pub fn kv(key: &str, value: &str) {
        println!("  {}: {}", style(key).dim(), value);
    }

    /// Print a list item.
    pub fn list_item(msg: &str) {
        println!("  {} {}", style("*").cyan(), msg);
    }

    /// Print a web search hit.
    pub fn web_result(index: usize, result: &WebResult) {
        println!(
            "\n{} {}",
            style(format!("{}.", index)).green(),
            style(&result.title).bold()
        );
        println!("   {}", content_preview(&result.snippet, 200));
        println!("   {}", style(&result.link).dim());
    }

    /// Print a video search hit.
    pub fn video_result(index: usize, result: &VideoResult) {
        println!(
            "  {} {}",
            style(format!("{}.", index)).cyan(),
            style(&result.title).bold()
        );
        println!("     {}", style(&result.link).dim());
    }

    /// Print one reasoning step.
    pub fn step(index: usize, step: &ResolutionStep) {
        println!("\n{} {}", style(format!("Step {}", index)).bold(), step.thought);
        if let Some(action) = &step.action {
            println!(
                "  {} {}({})",
                style("action").cyan(),
                action,
                step.action_input.as_deref().unwrap_or_default()
            );
        }
        if let Some(observation) = &step.observation {
            println!(
                "  {} {}",
                style("observation").dim(),
                content_preview(observation, 300)
            );
        }
    }

    /// Print how a resolution ended, if not with an answer.
    pub fn termination(terminated: Termination) {
        match terminated {
            Termination::Answered => {}
            Termination::MaxIterations | Termination::Cancelled => {
                Output::warning(&format!("Stopped: {}", terminated))
            }
            Termination::Error => Output::error(&format!("Stopped: {}", terminated)),
        }
    }

    /// Create a spinner.
    pub fn spinner(msg: &str) -> ProgressBar {
        let pb = ProgressBar::new_spinner();
        if let Ok(spinner_style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
            pb.set_style(spinner_style);
        }
        pb.set_message(msg.to_string());
        pb.enable_steady_tick(std::time::Duration::from_millis(100));
        pb
    }
}

/// Single-line preview, cut on a char boundary.
fn content_preview(content: &str, max_chars: usize) -> String {
    crate::http::truncate(&content.replace('\n', " "), max_chars)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_preview_flattens_and_cuts() {
        assert_eq!(content_preview("a\nb", 10), "a b");
        assert_eq!(content_preview("ååååååå", 5), "åå...");
    }
}
