//! # Remote Completion Client
//!
//! File: cli/src/chat/client.rs
//!
//! ## Overview
//!
//! Sends a transcript to a hosted chat-completion endpoint and returns the
//! text of the first choice. The wire format is the widely used
//! `POST /v1/chat/completions` shape:
//!
//! ```json
//! { "model": "gpt-3.5-turbo", "messages": [{"role": "system", "content": "..."}],
//!   "temperature": 0.7, "max_tokens": 1024 }
//! ```
//!
//! and the reply is read from `choices[0].message.content`.
//!
//! ## Failure Modes
//!
//! Every one of these is an `Err`, and no retries are attempted:
//! - Transport failure or timeout (`ChatterifyError::CompletionTransport`)
//! - Non-2xx status (`ChatterifyError::CompletionStatus`)
//! - Undecodable body, no choices, or empty content (`ChatterifyError::MalformedCompletion`)
//!
//! Model, temperature and token limit are fixed constants. The endpoint
//! URL, credential and timeout come from `CompletionConfig`.
//!
use super::backend::CompletionBackend;
use super::message::TranscriptEntry;
use crate::core::config::CompletionConfig;
use crate::core::error::{ChatterifyError, Result};
use anyhow::{anyhow, Context};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

pub const MODEL: &str = "gpt-3.5-turbo";
pub const TEMPERATURE: f32 = 0.7;
pub const MAX_TOKENS: u32 = 1024;

#[derive(Serialize, Debug)]
struct CompletionRequest<'a> {
    model: &'static str,
    messages: &'a [TranscriptEntry],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Deserialize, Debug)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize, Debug)]
struct Choice {
    message: Option<ChoiceMessage>,
}

#[derive(Deserialize, Debug)]
struct ChoiceMessage {
    content: Option<String>,
}

/// Client for the hosted chat-completion endpoint.
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    http: reqwest::Client,
    api_url: String,
    api_key: Option<String>,
}

impl OpenAiClient {
    pub fn new(config: &CompletionConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("chatterify/", env!("CARGO_PKG_VERSION")))
            .timeout(config.timeout)
            .build()
            .context("Failed to build HTTP client for completions")?;
        Ok(Self {
            http,
            api_url: config.api_url.clone(),
            api_key: config.api_key.clone(),
        })
    }

    /// Sends `transcript` and returns the first completion's text.
    pub async fn send(&self, transcript: &[TranscriptEntry]) -> Result<String> {
        let body = CompletionRequest {
            model: MODEL,
            messages: transcript,
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        };

        let mut request = self.http.post(&self.api_url).json(&body);
        match &self.api_key {
            Some(key) => request = request.bearer_auth(key),
            None => warn!("Sending completion request without an API key"),
        }

        debug!(
            "POST {} with {} transcript entries",
            self.api_url,
            transcript.len()
        );
        let response = request.send().await.map_err(ChatterifyError::from)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow!(ChatterifyError::CompletionStatus {
                status: status.as_u16(),
                body,
            }));
        }

        let parsed: CompletionResponse = response
            .json()
            .await
            .map_err(|e| ChatterifyError::MalformedCompletion(e.to_string()))?;
        extract_text(parsed)
    }
}

fn extract_text(response: CompletionResponse) -> Result<String> {
    let choice = response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| ChatterifyError::MalformedCompletion("no choices returned".into()))?;

    match choice.message.and_then(|m| m.content) {
        Some(text) if !text.trim().is_empty() => Ok(text),
        _ => Err(anyhow!(ChatterifyError::MalformedCompletion(
            "first choice has no content".into()
        ))),
    }
}

#[async_trait]
impl CompletionBackend for OpenAiClient {
    async fn complete(&self, transcript: &[TranscriptEntry]) -> Result<String> {
        self.send(transcript).await
    }

    fn name(&self) -> &'static str {
        "remote"
    }
}
