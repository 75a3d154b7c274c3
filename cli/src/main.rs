//! # Chatterify Main Entry Point
//!
//! File: cli/src/main.rs
//!
//! ## Overview
//!
//! Entry point for the Chatterify CLI. It handles:
//! - Command-line argument parsing using Clap
//! - Setting up the logging system based on verbosity flags
//! - Loading the layered configuration once
//! - Routing execution to the command handlers
//!
//! ## Architecture
//!
//! - `chat`: Conversation store, widget controller, completion backends
//! - `contact`: Contact form validation and the email relay
//! - `commands`: One handler per top-level command
//! - `core`: Configuration and the error type
//!
//! ## Examples
//!
//! ```bash
//! # Talk to the assistant without a credential
//! chatterify chat --offline
//!
//! # One question against the configured endpoint, with debug logs
//! OPENAI_API_KEY=sk-... chatterify -vv ask "How much does it cost?"
//!
//! # Serve the built site and its API
//! chatterify srv ./dist
//! ```
//!
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::{fmt, EnvFilter};

mod chat;
mod commands;
mod contact;
mod core;

#[derive(Parser, Debug)]
#[command(
    name = "chatterify",
    about = "💬 Chatterify: AI chat assistant and site tooling",
    long_about = "Chat with the Chatterify assistant, relay contact requests, and serve the\n\
                  marketing site with its chat and contact endpoints.",
    propagate_version = true,
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Read configuration from this file instead of the user and project files.
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,
}

#[derive(Parser, Debug)]
enum Commands {
    #[command(alias = "c")]
    Chat(commands::chat::ChatArgs),
    #[command(alias = "a")]
    Ask(commands::ask::AskArgs),
    Contact(commands::contact::ContactArgs),
    Config(commands::config::ConfigArgs),
    #[command(alias = "s")]
    Srv(commands::srv::SrvArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();

    tracing::debug!("Parsed CLI arguments: {:?}", cli);

    let command_result = match crate::core::config::load_config(cli.config.as_deref()) {
        Ok(config) => {
            tracing::debug!("Effective configuration: {:?}", crate::core::config::redacted(&config));
            match cli.command {
                Commands::Chat(args) => commands::chat::handle_chat(args, &config).await,
                Commands::Ask(args) => commands::ask::handle_ask(args, &config).await,
                Commands::Contact(args) => commands::contact::handle_contact(args, &config).await,
                Commands::Config(args) => commands::config::handle_config(args, &config).await,
                Commands::Srv(args) => commands::srv::handle_srv(args, &config).await,
            }
        }
        Err(e) => Err(e),
    };

    if let Err(e) = command_result {
        tracing::error!("Command execution failed: {:?}", e);
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}
