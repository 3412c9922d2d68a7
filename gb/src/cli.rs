//! CLI command definitions and subcommands

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::debug;

use crate::config::LlmConfig;
use crate::domain::Language;

/// GoalBreaker - turn a goal into a five-step plan
#[derive(Parser)]
#[command(
    name = "gb",
    about = "Break goals into five actionable steps using a model chain with offline fallbacks",
    version = env!("CARGO_PKG_VERSION"),
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, help = "Path to config file")]
    pub config: Option<PathBuf>,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[arg(
        short = 'l',
        long = "log-level",
        global = true,
        help = "Log level (TRACE, DEBUG, INFO, WARN, ERROR)"
    )]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Break a goal into five steps (guardrail first unless --no-guard)
    Breakdown {
        /// Goal text
        goal: String,

        /// Output language (en, am)
        #[arg(short = 'L', long, default_value = "en", value_parser = parse_language)]
        language: Language,

        /// Skip the guardrail classifier
        #[arg(long)]
        no_guard: bool,

        /// Do not record the plan in history
        #[arg(long)]
        no_history: bool,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Expand a single step into up to three sub-steps
    Expand {
        /// Step text
        step: String,

        /// Output language (en, am)
        #[arg(short = 'L', long, default_value = "en", value_parser = parse_language)]
        language: Language,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Classify a goal as ok, gibberish or abuse
    Classify {
        /// Goal text
        goal: String,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Show or prune recently generated plans
    History {
        #[command(subcommand)]
        command: HistoryCommand,
    },

    /// Print the effective configuration
    Config,
}

/// History subcommands
#[derive(Debug, Subcommand)]
pub enum HistoryCommand {
    /// List recent plans, newest first
    List {
        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Delete a plan by id (or unique id prefix)
    Delete {
        /// Entry id
        id: String,
    },
}

/// Lenient language parsing: anything that is not Amharic is English
fn parse_language(s: &str) -> Result<Language, String> {
    Ok(Language::normalize(s))
}

/// Get the log file path
pub fn get_log_path() -> PathBuf {
    debug!("get_log_path: called");
    let path = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("goalbreaker")
        .join("logs")
        .join("goalbreaker.log");
    debug!(?path, "get_log_path: returning path");
    path
}

/// Generate the after_help text with model access status and log location
pub fn generate_after_help() -> String {
    debug!("generate_after_help: called");
    let llm = LlmConfig::default();
    let online = llm.get_api_key().is_some();

    let mut help = String::new();

    help.push_str("Model access:\n");
    let icon = if online {
        debug!("generate_after_help: api key present");
        "\u{2705}"
    } else {
        debug!("generate_after_help: api key missing");
        "\u{274C}"
    };
    let mode = if online { "online" } else { "offline (canned plans)" };
    help.push_str(&format!("  {} {} via {}\n", icon, mode, llm.api_key_env));

    help.push('\n');
    help.push_str(&format!("Logs are written to: {}\n", get_log_path().display()));

    help
}

/// Output format for plans, verdicts and history
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        debug!(%s, "OutputFormat::from_str: called");
        match s.to_lowercase().as_str() {
            "text" | "plain" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => {
                debug!(%s, "OutputFormat::from_str: unknown format");
                Err(format!("Unknown format: {}. Use: text or json", s))
            }
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Json => write!(f, "json"),
        }
    }
}
