//! # Completion Backends
//!
//! File: cli/src/chat/backend.rs
//!
//! The chat session does not know where replies come from. Anything that
//! turns a transcript into text implements `CompletionBackend`:
//!
//! - `client::OpenAiClient`: the hosted chat-completion endpoint.
//! - `fallback::CannedResponder`: the static response table, for running
//!   without a reachable or configured endpoint.
//!
//! The trait is object safe (through `async_trait`) so hosts can pick a
//! backend at runtime and share it as `Arc<dyn CompletionBackend>`.
//!
use super::message::TranscriptEntry;
use crate::core::error::Result;
use async_trait::async_trait;

#[async_trait]
pub trait CompletionBackend: Send + Sync {
    /// Produces the reply text for `transcript`, which starts with the
    /// system entry and ends with the newest user entry.
    async fn complete(&self, transcript: &[TranscriptEntry]) -> Result<String>;

    /// Short name used in logs.
    fn name(&self) -> &'static str;
}
