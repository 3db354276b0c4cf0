//! Backup Orchestrator - command line entry point
//!
//! Runs one trigger or verify invocation and prints the response envelope.

use anyhow::Result;
use backup_orchestrator::clock::SystemClock;
use backup_orchestrator::control_plane::{
    HttpControlPlane, InMemoryControlPlane, SharedControlPlane,
};
use backup_orchestrator::models::JobState;
use backup_orchestrator::{handler, utils, Config, Orchestrator};
use clap::{Parser, Subcommand};
use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long)]
    log_level: Option<String>,

    /// Use an in-memory control plane instead of the configured API
    #[arg(long)]
    dry_run: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start on-demand backups
    Trigger {
        /// Resource to back up (repeatable); without any, tag or demo selection applies
        #[arg(long = "resource-arn", value_name = "ARN")]
        resource_arns: Vec<String>,

        /// Seconds to wait for completion (overrides config)
        #[arg(long, value_name = "SECS")]
        wait: Option<u64>,
    },
    /// Check that a recent backup completed
    Verify {
        /// Only consider jobs for this resource
        #[arg(long = "resource-arn", value_name = "ARN")]
        resource_arn: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = Config::load(args.config.as_deref())?;

    let log_level = args.log_level.as_deref().unwrap_or(&config.log.level);
    utils::logger::init(log_level)?;

    let control_plane: SharedControlPlane = if args.dry_run {
        tracing::info!("Dry run: using in-memory control plane");
        Arc::new(InMemoryControlPlane::new().with_initial_state(JobState::Completed))
    } else {
        let client = HttpControlPlane::new(&config.control_plane)?;
        tracing::debug!(url = %client.base_url(), "Using control plane API");
        Arc::new(client)
    };

    let orchestrator = Orchestrator::new(&config, control_plane, Arc::new(SystemClock));

    let response = match args.command {
        Command::Trigger {
            resource_arns,
            wait,
        } => {
            let mut event = json!({});
            if !resource_arns.is_empty() {
                event["resource_arns"] = json!(resource_arns);
            }
            if let Some(wait) = wait {
                event["wait_seconds"] = json!(wait);
            }
            handler::handle_trigger(&orchestrator, event).await?
        }
        Command::Verify { resource_arn } => {
            let event = json!({ "resource_arn": resource_arn });
            handler::handle_verify(&orchestrator, event).await?
        }
    };

    println!("{}", serde_json::to_string(&response)?);
    Ok(())
}
