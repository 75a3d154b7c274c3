//! # One-Shot Question
//!
//! File: cli/src/commands/ask.rs
//!
//! `chatterify ask <message...>` runs a single round in a fresh session and
//! prints the bot's reply. A failed completion still prints the fallback
//! text and exits 0, the same as the widget would show it.
//!
use crate::chat::{self, session::ChatSession};
use crate::core::config::AppConfig;
use crate::core::error::Result;
use clap::Parser;
use tracing::info;

/// Ask the assistant one question.
#[derive(Parser, Debug)]
pub struct AskArgs {
    /// Answer from the built-in response table instead of the remote endpoint.
    #[arg(long)]
    pub offline: bool,

    /// The question. Multiple words are joined with spaces.
    #[arg(required = true, num_args = 1..)]
    pub message: Vec<String>,
}

/// Entry point for `chatterify ask`.
pub async fn handle_ask(args: AskArgs, config: &AppConfig) -> Result<()> {
    let backend = chat::backend_for(config, args.offline)?;
    let mut session = ChatSession::new(config.chat.fallback);
    session.open();
    session.set_input(args.message.join(" "));

    info!("Asking {} backend", backend.name());
    match session.send(backend.as_ref()).await {
        Some(reply) => {
            println!("{}", reply.text());
            Ok(())
        }
        None => anyhow::bail!("Nothing to ask: the message is empty"),
    }
}
