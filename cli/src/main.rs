//! CLI entrypoint for Alfredo
//!
//! Wires the layers together: config and gateway from the infrastructure
//! crate, graph orchestration from the application crate.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Parser;
use colored::Colorize;
use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_subscriber::EnvFilter;

use alfredo_application::{Agent, VisionModel};
use alfredo_domain::TodoStore;
use alfredo_infrastructure::{builtin_registry, FileConfig, JsonlRunLogger, OpenAiChatModel};

#[derive(Parser, Debug)]
#[command(name = "alfredo", about = "Autonomous task agent", version)]
struct Cli {
    /// Task to run
    task: String,

    /// Model name (overrides config)
    #[arg(long)]
    model: Option<String>,

    /// Working directory for tools
    #[arg(long)]
    cwd: Option<PathBuf>,

    /// Explicit config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Skip the planning phase and go straight to acting
    #[arg(long)]
    no_planning: bool,

    /// Maximum graph steps before aborting
    #[arg(long)]
    recursion_limit: Option<usize>,

    /// Print the execution trace after the run
    #[arg(long)]
    show_trace: bool,

    /// Append a JSONL record of the run to this file
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let mut config = FileConfig::load(cli.config.as_deref()).context("loading config")?;
    if let Some(model) = cli.model {
        config.model = model;
    }
    if cli.no_planning {
        config.enable_planning = false;
    }
    if let Some(limit) = cli.recursion_limit {
        config.recursion_limit = limit;
    }

    let api_key = match std::env::var(&config.api_key_env) {
        Ok(key) if !key.is_empty() => key,
        _ => bail!("API key not found; set the {} environment variable", config.api_key_env),
    };

    let cwd = cli
        .cwd
        .or(config.working_dir.clone())
        .map(Ok)
        .unwrap_or_else(std::env::current_dir)?;

    info!(model = %config.model, cwd = %cwd.display(), "Starting run");

    // === Dependency injection ===
    let gateway = Arc::new(OpenAiChatModel::new(
        &config.api_base,
        api_key,
        &config.model,
    ));
    let todo = Arc::new(TodoStore::new());
    let registry = Arc::new(builtin_registry(
        todo.clone(),
        Some(gateway.clone() as Arc<dyn VisionModel>),
    ));

    let cancel = CancellationToken::new();
    let ctrl_c_token = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            ctrl_c_token.cancel();
        }
    });

    let mut agent = Agent::new(gateway, registry, &cwd)
        .with_todo_store(todo)
        .with_planning(config.enable_planning)
        .with_recursion_limit(config.recursion_limit)
        .with_max_context_tokens(config.max_context_tokens)
        .with_cancellation(cancel);

    let state = agent.run(&cli.task).await?;

    if let Some(path) = cli.log_file.or(config.log_file.clone()) {
        let logger = JsonlRunLogger::create(&path).context("opening run log")?;
        logger.log_run(&state).context("writing run log")?;
    }

    if cli.show_trace {
        agent.display_trace()?;
        println!();
    }

    match &state.final_answer {
        Some(answer) => {
            let status = if state.is_verified {
                "verified".green()
            } else {
                "unverified".yellow()
            };
            println!("{} ({})", "Result".bold(), status);
            println!();
            println!("{}", answer);
        }
        None => {
            println!("{}", "No final answer produced.".yellow());
        }
    }

    Ok(())
}
