//! Doctor command - verify credentials and configuration.

use crate::cli::Output;
use crate::config::{
    mask, Credentials, Settings, LLM_API_KEY_FALLBACK_VAR, LLM_API_KEY_VAR, TAVILY_API_KEY_VAR,
    YOUTUBE_API_KEY_VAR,
};
use console::style;

/// Check result for a single item.
#[derive(Debug)]
pub struct CheckResult {
    pub name: String,
    pub status: CheckStatus,
    pub message: String,
    pub hint: Option<String>,
}

#[derive(Debug, PartialEq)]
pub enum CheckStatus {
    Ok,
    Warning,
    Error,
}

impl CheckResult {
    fn ok(name: &str, message: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Ok,
            message: message.to_string(),
            hint: None,
        }
    }

    fn warning(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Warning,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    fn error(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Error,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    fn print(&self) {
        let icon = match self.status {
            CheckStatus::Ok => style("✓").green(),
            CheckStatus::Warning => style("!").yellow(),
            CheckStatus::Error => style("✗").red(),
        };

        println!("  {} {} - {}", icon, style(&self.name).bold(), self.message);

        if let Some(hint) = &self.hint {
            println!("    {} {}", style("→").dim(), style(hint).dim());
        }
    }
}

/// Run all diagnostic checks.
pub fn run_doctor(settings: &Settings) -> anyhow::Result<()> {
    Output::header("Scout Doctor");
    println!();
    println!("Checking credentials and configuration...\n");

    let mut checks = Vec::new();

    println!("{}", style("API Keys").bold());
    let key_checks = credential_checks(&Credentials::from_env());
    for check in &key_checks {
        check.print();
    }
    checks.extend(key_checks);

    println!();

    println!("{}", style("Configuration").bold());
    let config_checks = vec![check_config_file(), check_settings(settings)];
    for check in &config_checks {
        check.print();
    }
    checks.extend(config_checks);

    println!();

    let errors = checks.iter().filter(|c| c.status == CheckStatus::Error).count();
    let warnings = checks.iter().filter(|c| c.status == CheckStatus::Warning).count();

    if errors > 0 {
        Output::error(&format!(
            "{} error(s) found. Please fix them before using Scout.",
            errors
        ));
        anyhow::bail!("doctor found {} error(s)", errors);
    } else if warnings > 0 {
        Output::warning(&format!(
            "All checks passed with {} warning(s).",
            warnings
        ));
    } else {
        Output::success("All checks passed! Scout is ready to use.");
    }

    Ok(())
}

/// One check per upstream key. Only the video key is optional.
fn credential_checks(credentials: &Credentials) -> Vec<CheckResult> {
    let llm_hint = format!(
        "Set {} (or {}) in your environment or .env file",
        LLM_API_KEY_VAR, LLM_API_KEY_FALLBACK_VAR
    );

    vec![
        match &credentials.llm_api_key {
            Some(key) => CheckResult::ok(LLM_API_KEY_VAR, &format!("configured ({})", mask(key))),
            None => CheckResult::error(LLM_API_KEY_VAR, "not set", &llm_hint),
        },
        match &credentials.tavily_api_key {
            Some(key) => {
                CheckResult::ok(TAVILY_API_KEY_VAR, &format!("configured ({})", mask(key)))
            }
            None => CheckResult::error(
                TAVILY_API_KEY_VAR,
                "not set",
                "Get a key at https://tavily.com and set TAVILY_API_KEY",
            ),
        },
        match &credentials.youtube_api_key {
            Some(key) => {
                CheckResult::ok(YOUTUBE_API_KEY_VAR, &format!("configured ({})", mask(key)))
            }
            None => CheckResult::warning(
                YOUTUBE_API_KEY_VAR,
                "not set (video search disabled)",
                "Create a YouTube Data API v3 key and set YOUTUBE_API_KEY",
            ),
        },
    ]
}

/// Check if config file exists.
fn check_config_file() -> CheckResult {
    let config_path = Settings::default_config_path();
    if config_path.exists() {
        CheckResult::ok("Config file", &format!("{}", config_path.display()))
    } else {
        CheckResult::warning(
            "Config file",
            "using defaults",
            "Create with: scout config edit",
        )
    }
}

fn check_settings(settings: &Settings) -> CheckResult {
    match settings.validate() {
        Ok(()) => CheckResult::ok(
            "Settings",
            &format!(
                "{} via {}, up to {} step(s)",
                settings.llm.model, settings.llm.api_base, settings.agent.max_iterations
            ),
        ),
        Err(e) => CheckResult::error("Settings", &e.to_string(), "Fix with: scout config edit"),
    }
}
