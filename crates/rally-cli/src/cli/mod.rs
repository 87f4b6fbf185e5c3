//! CLI for the rally execution controller.

mod commands;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use rally_core::config;

use commands::{run_backoff, run_classify, run_config, run_simulate};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "rally")]
#[command(about = "rally: retry/backoff orchestration with bounded loading state", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Classify an error message and show the user-facing text.
    Classify {
        /// Raw error message, e.g. "Request failed: 404 Not Found".
        message: String,
        /// Context prepended to the message (e.g. "Submitting claim").
        #[arg(long)]
        context: Option<String>,
    },

    /// Print the backoff schedule for the configured (or given) retry budget.
    Backoff {
        /// Total attempts, including the first.
        #[arg(long, value_name = "N")]
        max_retries: Option<u32>,
        /// Base delay in milliseconds.
        #[arg(long, value_name = "MS")]
        base_delay_ms: Option<u64>,
    },

    /// Run a simulated operation through the executor and a loading tracker.
    Simulate(SimulateArgs),

    /// Show the config file path and effective values.
    Config,
}

/// Options for `rally simulate`.
#[derive(Debug, Clone, Args)]
pub struct SimulateArgs {
    /// Number of leading attempts that fail.
    #[arg(long, default_value = "2", value_name = "N")]
    pub fail_times: u32,
    /// Error message the failing attempts report.
    #[arg(long, default_value = "500 Internal Server Error", value_name = "MSG")]
    pub error: String,
    /// Time each attempt takes, in milliseconds.
    #[arg(long, default_value = "300", value_name = "MS")]
    pub work_ms: u64,
    /// Override the retry budget from config.
    #[arg(long, value_name = "N")]
    pub max_retries: Option<u32>,
    /// Override the backoff base from config.
    #[arg(long, value_name = "MS")]
    pub base_delay_ms: Option<u64>,
    /// Override the loading deadline from config.
    #[arg(long, value_name = "MS")]
    pub timeout_ms: Option<u64>,
    /// Simulate loading progress.
    #[arg(long)]
    pub show_progress: bool,
    /// Context prepended to error messages.
    #[arg(long)]
    pub context: Option<String>,
    /// Print final snapshots as JSON.
    #[arg(long)]
    pub json: bool,
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Classify { message, context } => {
                run_classify(&message, context.as_deref())
            }
            CliCommand::Backoff {
                max_retries,
                base_delay_ms,
            } => run_backoff(&cfg, max_retries, base_delay_ms),
            CliCommand::Simulate(args) => run_simulate(&cfg, &args).await?,
            CliCommand::Config => run_config(&cfg)?,
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
