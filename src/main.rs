mod cmd;
mod config;
mod context;
mod domain;
mod error;
mod infra;
mod services;
mod ui;
mod workflow;

use std::fs;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use crate::cmd::config::{self as config_cmd, ConfigArgs};
use crate::cmd::show::{self, OutputFormat};
use crate::config::{AppConfig, ConfigOverrides, log_file_path};
use crate::context::AppContext;
use crate::domain::board::{Grouping, Ordering};
use crate::error::AppResult;
use crate::infra::http::HttpTicketSource;

const LOG_ENV: &str = "KANBAN_LOG";
const FILE_LOG_FILTER: &str = "kanban=info";
const STDERR_LOG_FILTER: &str = "kanban=warn";

#[derive(Parser)]
#[command(name = "kanban", author, version, about = "Terminal kanban board for a remote ticket feed")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the interactive board (default).
    Board(ViewArgs),
    /// Fetch once and print the grouped board.
    Show(ShowArgs),
    /// Manage stored configuration.
    Config(ConfigArgs),
}

#[derive(Args, Default)]
struct ViewArgs {
    /// Board endpoint returning `{ tickets, users }`.
    #[arg(long)]
    endpoint: Option<String>,
    /// Group columns by status, user or priority.
    #[arg(short, long, value_parser = parse_grouping)]
    group: Option<Grouping>,
    /// Order cards by title or priority.
    #[arg(short, long, value_parser = parse_ordering)]
    order: Option<Ordering>,
}

impl ViewArgs {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            endpoint: self.endpoint.clone(),
            grouping: self.group,
            ordering: self.order,
        }
    }
}

#[derive(Args)]
struct ShowArgs {
    #[command(flatten)]
    view: ViewArgs,
    /// Output format: text or json.
    #[arg(short, long, default_value = "text", value_parser = parse_format)]
    format: OutputFormat,
}

fn parse_grouping(value: &str) -> Result<Grouping, String> {
    Grouping::from_str(value)
        .ok_or_else(|| format!("unknown grouping '{value}' (expected status, user or priority)"))
}

fn parse_ordering(value: &str) -> Result<Ordering, String> {
    Ordering::from_str(value)
        .ok_or_else(|| format!("unknown ordering '{value}' (expected title or priority)"))
}

fn parse_format(value: &str) -> Result<OutputFormat, String> {
    OutputFormat::from_str(value)
        .ok_or_else(|| format!("unknown format '{value}' (expected text or json)"))
}

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

async fn run() -> AppResult<()> {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or_else(|| Commands::Board(ViewArgs::default()));
    let _log_guard = init_logging(matches!(command, Commands::Board(_)));

    match command {
        Commands::Config(args) => config_cmd::run(args.command),
        Commands::Board(args) => {
            let context = build_context(&args)?;
            cmd::board::run(&context).await
        }
        Commands::Show(args) => {
            let context = build_context(&args.view)?;
            let output = show::run(&context, args.format).await?;
            println!("{output}");
            Ok(())
        }
    }
}

fn build_context(args: &ViewArgs) -> AppResult<AppContext> {
    let config = AppConfig::load(args.overrides())?;
    tracing::debug!(endpoint = %config.endpoint, "configuration loaded");
    let source = Arc::new(HttpTicketSource::new(config.endpoint.clone()));
    Ok(AppContext::new(config, source))
}

/// Stderr shares the terminal with `show` output, so it only carries warnings unless `KANBAN_LOG`
/// says otherwise.
fn default_log_filter(interactive: bool) -> &'static str {
    if interactive {
        FILE_LOG_FILTER
    } else {
        STDERR_LOG_FILTER
    }
}

fn env_filter(default: &str) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default))
}

/// The interactive board owns the terminal, so its logs go to a file. Everything else logs to
/// stderr.
fn init_logging(interactive: bool) -> Option<WorkerGuard> {
    if !interactive {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter(default_log_filter(false)))
            .with_writer(std::io::stderr)
            .init();
        return None;
    }

    let path = log_file_path().ok()?;
    let directory = path.parent()?;
    let file_name = path.file_name()?;
    fs::create_dir_all(directory).ok()?;

    let appender = tracing_appender::rolling::never(directory, file_name);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(default_log_filter(true)))
        .with_writer(writer)
        .with_ansi(false)
        .init();
    Some(guard)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_log_is_more_verbose_than_stderr() {
        assert_eq!(default_log_filter(true), "kanban=info");
        assert_eq!(default_log_filter(false), "kanban=warn");
    }

    #[test]
    fn default_filters_parse() {
        for interactive in [true, false] {
            assert!(EnvFilter::try_new(default_log_filter(interactive)).is_ok());
        }
    }

    #[test]
    fn board_is_the_default_command() {
        let cli = Cli::try_parse_from(["kanban"]).unwrap();
        assert!(cli.command.is_none());

        let cli = Cli::try_parse_from(["kanban", "show", "-g", "userId", "-f", "json"]).unwrap();
        match cli.command {
            Some(Commands::Show(args)) => {
                assert_eq!(args.view.group, Some(Grouping::User));
                assert_eq!(args.format, OutputFormat::Json);
            }
            _ => panic!("expected show"),
        }
    }
}
