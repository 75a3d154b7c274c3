//! # Chatterify Chat Assistant
//!
//! File: cli/src/chat/mod.rs
//!
//! ## Overview
//!
//! The chat assistant is the floating widget's message pipeline: user input
//! becomes a transcript, the transcript goes to a completion backend, and the
//! reply (or a fallback) lands in the conversation.
//!
//! ## Architecture
//!
//! Leaves first:
//! - `message`: Message records, transcript entries and the projection between them
//! - `store`: The append-only conversation store
//! - `fallback`: The static response table, `CannedResponder` and `FallbackPolicy`
//! - `backend`: The `CompletionBackend` trait
//! - `client`: `OpenAiClient`, the hosted completion endpoint
//! - `session`: `ChatSession`, the widget controller and its state machine
//!
//! ## Usage
//!
//! ```rust
//! let backend = chat::backend_for(&config, false)?;
//! let mut session = ChatSession::new(config.chat.fallback);
//! session.open();
//! session.set_input("How much does it cost?");
//! if let Some(reply) = session.send(backend.as_ref()).await {
//!     println!("{}", reply.text());
//! }
//! ```
//!
pub mod backend;
pub mod client;
pub mod fallback;
pub mod message;
pub mod session;
pub mod store;

use crate::core::config::AppConfig;
use crate::core::error::Result;
use backend::CompletionBackend;
use std::sync::Arc;
use tracing::info;

/// Picks the backend for a host: the canned table when `offline`, the
/// remote endpoint otherwise.
pub fn backend_for(config: &AppConfig, offline: bool) -> Result<Arc<dyn CompletionBackend>> {
    if offline {
        info!("Using offline canned responses");
        Ok(Arc::new(fallback::CannedResponder))
    } else {
        Ok(Arc::new(client::OpenAiClient::new(&config.completion)?))
    }
}
