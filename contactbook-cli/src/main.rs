use anyhow::Result;
use clap::Parser;
use contactbook_core::config::Config;
use contactbook_core::logging::init_logging_with_config;
use contactbook_core::metrics::init_metrics;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{debug, info};

mod commands;
mod state;

use commands::Command;
use state::{expand_path, Node};

#[derive(Parser, Debug)]
#[command(name = "contactbook")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file (TOML); defaults plus CONTACTBOOK_* variables otherwise
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// State file of the local node, overriding the configured one
    #[arg(long)]
    state: Option<PathBuf>,

    /// Set the log level (trace, debug, info, warn, error)
    #[arg(short, long)]
    log_level: Option<String>,

    /// Enable JSON formatted logging
    #[arg(long)]
    json_logs: bool,

    /// Login name of the local user to act as
    #[arg(long = "as", global = true)]
    acting: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => Config::from_file(path)?,
        None => Config::from_env()?,
    };
    if let Some(level) = &args.log_level {
        config.logging.level = level.parse()?;
    }
    if args.json_logs {
        config.logging.json_format = true;
    }

    init_logging_with_config(config.logging.to_log_config())?;
    if config.metrics.enabled {
        init_metrics();
    }

    let state_path = expand_path(args.state.as_ref().unwrap_or(&config.service.state_file))?;
    debug!(state = %state_path.display(), "opening local node");
    let node = Node::open(&state_path)?;

    let reply = commands::run(&node, &config, args.acting.as_deref(), args.command).await?;
    node.save().await?;

    println!("{}", serde_json::to_string_pretty(&reply.body)?);
    if reply.failed {
        info!("command finished with status {}", reply.body["status"]);
    }
    Ok(reply.exit_code())
}
