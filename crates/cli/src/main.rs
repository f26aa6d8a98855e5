//! Stepwright CLI — the main entry point.
//!
//! Commands:
//! - `run`     — Send one request through the step loop
//! - `tools`   — Show the tool catalog
//! - `init`    — Write a default config file
//! - `doctor`  — Diagnose config and provider health

use clap::{Parser, Subcommand};

mod commands;
mod render;

#[derive(Parser)]
#[command(
    name = "stepwright",
    about = "Stepwright — a step-by-step coding assistant for your terminal",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one request through the agent
    Run {
        /// The request; prompts on stdin when omitted
        #[arg(short, long)]
        message: Option<String>,
    },

    /// List the tools the model can call
    Tools {
        /// Print the full system prompt instead of the catalog
        #[arg(long)]
        prompt: bool,
    },

    /// Write a default config file
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },

    /// Diagnose config and provider health
    Doctor,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Logs go to stderr; stdout carries the step trace
    let filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Run { message } => commands::run::run(message).await?,
        Commands::Tools { prompt } => commands::tools::run(prompt).await?,
        Commands::Init { force } => commands::init::run(force).await?,
        Commands::Doctor => commands::doctor::run().await?,
    }

    Ok(())
}
