//! GoalBreaker - goal to five-step plan
//!
//! CLI entry point for generating plans, expanding steps and managing history.

use std::fs;
use std::path::PathBuf;

use clap::{CommandFactory, FromArgMatches};
use colored::Colorize;
use eyre::{Context, Result, bail};
use tracing::{debug, info, warn};

use goalbreaker::cli::{Cli, Command, HistoryCommand, OutputFormat, generate_after_help};
use goalbreaker::config::Config;
use goalbreaker::domain::{GoalPlan, GuardrailVerdict, Language};
use goalbreaker::history::HistoryStore;
use goalbreaker::plan::PlanService;

fn setup_logging(cli_log_level: Option<&str>, config_log_level: Option<&str>) -> Result<()> {
    // Note: Can't log params here since logging isn't initialized yet
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("goalbreaker")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    // Determine log level with priority: CLI --log-level > config file > default (INFO)
    let level = match cli_log_level.or(config_log_level) {
        Some(s) => match s.to_uppercase().as_str() {
            "TRACE" => tracing::Level::TRACE,
            "DEBUG" => tracing::Level::DEBUG,
            "INFO" => tracing::Level::INFO,
            "WARN" | "WARNING" => tracing::Level::WARN,
            "ERROR" => tracing::Level::ERROR,
            _ => {
                eprintln!("Warning: Unknown log-level '{}', defaulting to INFO", s);
                tracing::Level::INFO
            }
        },
        None => tracing::Level::INFO,
    };

    let log_file = fs::File::create(log_dir.join("goalbreaker.log")).context("Failed to create log file")?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!("Logging initialized (level: {:?})", level);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Build command with dynamic after_help that shows model access and log path
    let cmd = Cli::command().after_help(generate_after_help());
    let cli = Cli::from_arg_matches(&cmd.get_matches())?;

    // Load log level from config file early (before full config load)
    let config_log_level = Config::load_log_level(cli.config.as_ref());
    setup_logging(cli.log_level.as_deref(), config_log_level.as_deref()).context("Failed to setup logging")?;

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    info!(models = ?config.llm.model_chain, "GoalBreaker loaded config");

    debug!(command = ?cli.command, "main: dispatching command");
    match cli.command {
        Command::Breakdown {
            goal,
            language,
            no_guard,
            no_history,
            format,
        } => cmd_breakdown(&config, &goal, language, no_guard, no_history, format).await,
        Command::Expand { step, language, format } => cmd_expand(&config, &step, language, format).await,
        Command::Classify { goal, format } => cmd_classify(&config, &goal, format).await,
        Command::History { command } => match command {
            HistoryCommand::List { format } => cmd_history_list(&config, format),
            HistoryCommand::Delete { id } => cmd_history_delete(&config, &id),
        },
        Command::Config => cmd_config(&config),
    }
}

fn require_text(text: &str, what: &str) -> Result<()> {
    if text.trim().is_empty() {
        bail!("{} must not be empty", what);
    }
    Ok(())
}

/// Generate a plan for a goal, gated by the guardrail unless disabled
async fn cmd_breakdown(
    config: &Config,
    goal: &str,
    language: Language,
    no_guard: bool,
    no_history: bool,
    format: OutputFormat,
) -> Result<()> {
    debug!(%language, no_guard, no_history, %format, "cmd_breakdown: called");
    require_text(goal, "Goal")?;
    let service = PlanService::from_config(config).context("Failed to create model client")?;

    let (verdict, plan) = if no_guard {
        (None, service.generate_breakdown(goal, language).await?)
    } else {
        let gated = service.plan_goal(goal, language).await;
        (Some(gated.verdict), gated.plan)
    };

    let accepted = verdict.as_ref().is_none_or(|v| v.status.is_ok());
    if accepted && !no_history {
        match HistoryStore::from_config(&config.history).record(goal, language, &plan) {
            Ok(entry) => debug!(id = %entry.id, "cmd_breakdown: recorded in history"),
            Err(e) => warn!(error = %e, "Failed to record plan in history"),
        }
    }

    match format {
        OutputFormat::Json => {
            let json = serde_json::json!({
                "goal": goal.trim(),
                "language": language,
                "offline": service.is_offline(),
                "verdict": verdict,
                "plan": plan,
            });
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
        OutputFormat::Text => {
            if let Some(verdict) = verdict.as_ref().filter(|v| !v.status.is_ok()) {
                print_rejection(verdict);
            }
            print_plan(&plan, service.is_offline());
        }
    }

    Ok(())
}

/// Expand a single step into sub-steps
async fn cmd_expand(config: &Config, step: &str, language: Language, format: OutputFormat) -> Result<()> {
    debug!(%language, %format, "cmd_expand: called");
    require_text(step, "Step")?;
    let service = PlanService::from_config(config).context("Failed to create model client")?;
    let plan = service.generate_sub_breakdown(step, language).await?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&plan)?),
        OutputFormat::Text => {
            println!("{}", step.trim().bright_cyan().bold());
            for substep in plan.substeps() {
                println!("  - {}", substep);
            }
        }
    }
    Ok(())
}

/// Print the guardrail verdict for a goal
async fn cmd_classify(config: &Config, goal: &str, format: OutputFormat) -> Result<()> {
    debug!(%format, "cmd_classify: called");
    require_text(goal, "Goal")?;
    let service = PlanService::from_config(config).context("Failed to create model client")?;
    let verdict = service.classify_goal(goal).await;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&verdict)?),
        OutputFormat::Text => {
            let status = match verdict.status.is_ok() {
                true => verdict.status.as_str().green(),
                false => verdict.status.as_str().red(),
            };
            if verdict.reason.is_empty() {
                println!("{}", status);
            } else {
                println!("{} ({})", status, verdict.reason);
            }
        }
    }
    Ok(())
}

fn cmd_history_list(config: &Config, format: OutputFormat) -> Result<()> {
    debug!(%format, "cmd_history_list: called");
    let store = HistoryStore::from_config(&config.history);
    let entries = store.recent().context("Failed to read history")?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&entries)?),
        OutputFormat::Text => {
            if entries.is_empty() {
                println!("{}", "No plans recorded yet.".dimmed());
                return Ok(());
            }
            for entry in &entries {
                println!(
                    "{} {} [{}] {}",
                    entry.short_id().yellow(),
                    entry.created_at.format("%Y-%m-%d %H:%M"),
                    entry.language,
                    entry.goal
                );
                for (i, step) in entry.plan.steps().iter().enumerate() {
                    println!("    {}. {}", i + 1, step);
                }
            }
        }
    }
    Ok(())
}

fn cmd_history_delete(config: &Config, id: &str) -> Result<()> {
    debug!(%id, "cmd_history_delete: called");
    let store = HistoryStore::from_config(&config.history);
    if !store.delete(id).context("Failed to update history")? {
        bail!("No history entry matches '{}'", id);
    }
    println!("Deleted {}", id.trim());
    Ok(())
}

fn cmd_config(config: &Config) -> Result<()> {
    debug!("cmd_config: called");
    print!("{}", serde_yaml::to_string(config)?);
    let key_state = if config.llm.get_api_key().is_some() {
        "set".green()
    } else {
        "not set (offline)".yellow()
    };
    println!("# {}: {}", config.llm.api_key_env, key_state);
    Ok(())
}

fn print_rejection(verdict: &GuardrailVerdict) {
    println!(
        "{} {} ({})",
        "Rejected:".red().bold(),
        verdict.status,
        if verdict.reason.is_empty() { "no reason given" } else { verdict.reason.as_str() }
    );
}

fn print_plan(plan: &GoalPlan, offline: bool) {
    let mut header = format!("Plan (complexity {}/10)", plan.complexity());
    if offline {
        header.push_str(" [offline]");
    }
    println!("{}", header.bright_cyan().bold());
    for (i, step) in plan.steps().iter().enumerate() {
        println!("  {}. {}", i + 1, step);
    }
}
