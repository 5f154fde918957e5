use std::io::{self, BufRead, Write};

use clap::{Args, Subcommand};

use crate::config::{StoredConfig, config_file_path};
use crate::domain::board::{Grouping, Ordering};
use crate::error::AppResult;
use crate::infra::http::DEFAULT_ENDPOINT;

#[derive(Args, Debug, Clone)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigCommand {
    /// Run the interactive configuration wizard.
    Init,
    /// Show the stored configuration.
    Show,
}

pub fn run(command: ConfigCommand) -> AppResult<()> {
    match command {
        ConfigCommand::Init => run_init(),
        ConfigCommand::Show => run_show(),
    }
}

fn run_init() -> AppResult<()> {
    let mut cfg = StoredConfig::load()?;

    println!("Configuring kanban.");
    println!("Press Enter to keep the current value, '-' to clear it.");
    println!();

    let stdin = io::stdin();
    let mut prompter = Prompter::new(stdin.lock(), io::stdout());
    prompter.apply(
        &format!("Board endpoint (default {DEFAULT_ENDPOINT})"),
        &mut cfg.endpoint,
        accept_any,
    )?;
    prompter.apply(
        "Default grouping (status/user/priority)",
        &mut cfg.default_grouping,
        validate_grouping,
    )?;
    prompter.apply(
        "Default ordering (title/priority)",
        &mut cfg.default_ordering,
        validate_ordering,
    )?;
    prompter.apply("Icon asset directory", &mut cfg.asset_root, accept_any)?;

    cfg.save()?;

    let path = config_file_path()?;
    tracing::info!(path = %path.display(), "configuration saved");
    println!("\nConfiguration saved to {}", path.display());
    Ok(())
}

fn run_show() -> AppResult<()> {
    let cfg = StoredConfig::load()?;
    let path = config_file_path()?;

    println!("Configuration file: {}", path.display());
    println!("Board endpoint: {}", display_value(&cfg.endpoint));
    println!("Default grouping: {}", display_value(&cfg.default_grouping));
    println!("Default ordering: {}", display_value(&cfg.default_ordering));
    println!("Icon asset directory: {}", display_value(&cfg.asset_root));

    Ok(())
}

type Validator = fn(&str) -> Result<String, String>;

fn accept_any(value: &str) -> Result<String, String> {
    Ok(value.to_string())
}

fn validate_grouping(value: &str) -> Result<String, String> {
    Grouping::from_str(value)
        .map(|grouping| grouping.as_str().to_string())
        .ok_or_else(|| format!("unknown grouping '{value}' (expected status, user or priority)"))
}

fn validate_ordering(value: &str) -> Result<String, String> {
    Ordering::from_str(value)
        .map(|ordering| ordering.as_str().to_string())
        .ok_or_else(|| format!("unknown ordering '{value}' (expected title or priority)"))
}

/// Asks one question per field, repeating it until the answer passes validation.
struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn apply(
        &mut self,
        field: &str,
        target: &mut Option<String>,
        validate: Validator,
    ) -> AppResult<()> {
        match self.ask(field, target.as_deref(), validate)? {
            PromptAction::Keep => {}
            PromptAction::Clear => *target = None,
            PromptAction::Set(value) => *target = Some(value),
        }
        Ok(())
    }

    fn ask(
        &mut self,
        field: &str,
        current: Option<&str>,
        validate: Validator,
    ) -> AppResult<PromptAction> {
        loop {
            match current {
                Some(value) => write!(
                    self.output,
                    "{field} [{value}] (Enter to keep, '-' to clear): "
                )?,
                None => write!(self.output, "{field} (Enter to skip): ")?,
            }
            self.output.flush()?;

            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                return Ok(PromptAction::Keep);
            }

            let checked = match parse_answer(&line) {
                PromptAction::Set(value) => validate(&value).map(PromptAction::Set),
                PromptAction::Keep => match current {
                    Some(value) => validate(value).map(|_| PromptAction::Keep),
                    None => Ok(PromptAction::Keep),
                },
                PromptAction::Clear => Ok(PromptAction::Clear),
            };
            match checked {
                Ok(action) => return Ok(action),
                Err(message) => writeln!(self.output, "  {message}")?,
            }
        }
    }
}

fn parse_answer(input: &str) -> PromptAction {
    let trimmed = input.trim();

    if trimmed.is_empty() {
        PromptAction::Keep
    } else if trimmed == "-" {
        PromptAction::Clear
    } else {
        PromptAction::Set(trimmed.to_string())
    }
}

fn display_value(value: &Option<String>) -> String {
    value
        .as_deref()
        .filter(|v| !v.is_empty())
        .map(|v| v.to_string())
        .unwrap_or_else(|| "<not set>".to_string())
}

#[derive(Debug, PartialEq, Eq)]
enum PromptAction {
    Keep,
    Clear,
    Set(String),
}
