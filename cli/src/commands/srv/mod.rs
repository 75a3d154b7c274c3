//! # Chatterify Site Server
//!
//! File: cli/src/commands/srv/mod.rs
//!
//! ## Overview
//!
//! Serves the built marketing site for local development and previews,
//! along with the JSON endpoints the chat widget and contact form call.
//!
//! ## Architecture
//!
//! - `config.rs`: `SrvArgs` and the merge with the `[site]` settings
//! - `api.rs`: `/api/chat`, `/api/contact` and `/api/health`
//! - `server_logic.rs`: Router, middleware, port search and shutdown
//! - `utils.rs`: Startup banner helpers
//!
//! ## Examples
//!
//! ```bash
//! # Serve ./dist on port 8000
//! chatterify srv
//!
//! # Another directory, reachable from the LAN
//! chatterify srv --host 0.0.0.0 --port 9000 ./public
//!
//! # Canned chat replies, no completion credential needed
//! chatterify srv --offline
//! ```
//!
use crate::chat;
use crate::contact::relay::EmailRelay;
use crate::core::config::AppConfig;
use crate::core::error::Result;
use std::sync::Arc;
use tracing::info;

pub use config::SrvArgs;

pub mod api;
pub mod config;
pub mod server_logic;
pub mod utils;

/// Entry point for `chatterify srv`.
pub async fn handle_srv(args: SrvArgs, app_config: &AppConfig) -> Result<()> {
    info!("Handling srv command with args: {:?}", args);

    let server_config = config::load_and_merge_config(&app_config.site, &args).await?;
    info!("Effective server config: {:?}", server_config);

    let state = Arc::new(api::AppState {
        backend: chat::backend_for(app_config, args.offline)?,
        relay: EmailRelay::new(&app_config.email)?,
        fallback: app_config.chat.fallback,
    });

    server_logic::run_server(server_config, state).await
}
