//! # Site API Endpoints
//!
//! File: cli/src/commands/srv/api.rs
//!
//! ## Overview
//!
//! JSON endpoints the marketing site calls from the browser so that the
//! completion credential and the email identifiers stay on the server:
//!
//! | Method | Path           | Success                         | Errors                 |
//! |--------|----------------|---------------------------------|------------------------|
//! | POST   | `/api/chat`    | `200 {"reply", "fallback"}`     | `422` no user turn     |
//! | POST   | `/api/contact` | `200 {"message"}`               | `422` invalid, `502`   |
//! | GET    | `/api/health`  | `200 {"status": "ok"}`          |                        |
//!
//! The server keeps no conversation state. The browser sends the turns it
//! holds and the server prepends the persona. A failed completion is never
//! an HTTP error: the configured fallback text comes back with
//! `"fallback": true`. A body that does not parse is answered with the
//! same `{"message"}` shape as every other error.
//!
use crate::chat::backend::CompletionBackend;
use crate::chat::fallback::{latest_user_text, FallbackPolicy};
use crate::chat::message::{Role, TranscriptEntry, PERSONA};
use crate::contact::form::ContactForm;
use crate::contact::relay::{EmailRelay, FAILED_NOTICE, SENT_NOTICE};
use crate::core::error::ChatterifyError;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};

/// Everything the handlers share. Built once per server.
pub struct AppState {
    pub backend: Arc<dyn CompletionBackend>,
    pub relay: EmailRelay,
    pub fallback: FallbackPolicy,
}

pub type SharedState = Arc<AppState>;

#[derive(Deserialize, Debug)]
pub struct ChatRequest {
    #[serde(default)]
    pub messages: Vec<TranscriptEntry>,
}

#[derive(Serialize, Deserialize, Debug, PartialEq)]
pub struct ChatReply {
    pub reply: String,
    pub fallback: bool,
}

#[derive(Serialize, Deserialize, Debug, PartialEq)]
pub struct Notice {
    pub message: String,
}

/// The `/api/*` routes, waiting for their state.
pub fn routes() -> Router<SharedState> {
    Router::new()
        .route("/api/chat", post(chat))
        .route("/api/contact", post(contact))
        .route("/api/health", get(health))
}

fn notice(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(Notice {
            message: message.into(),
        }),
    )
        .into_response()
}

fn rejected(rejection: JsonRejection) -> Response {
    debug!("Rejected request body: {}", rejection.body_text());
    notice(rejection.status(), rejection.body_text())
}

async fn chat(
    State(state): State<SharedState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return rejected(rejection),
    };
    let mut transcript = Vec::with_capacity(request.messages.len() + 1);
    transcript.push(TranscriptEntry::system(PERSONA));
    transcript.extend(
        request
            .messages
            .into_iter()
            .filter(|entry| entry.role != Role::System),
    );

    match transcript.last_mut() {
        Some(last) if last.role == Role::User && !last.content.trim().is_empty() => {
            last.content = last.content.trim().to_string();
        }
        _ => {
            return notice(
                StatusCode::UNPROCESSABLE_ENTITY,
                "The last message must be a non-empty user turn.",
            )
        }
    }

    debug!(
        "Chat request with {} turns for {} backend",
        transcript.len() - 1,
        state.backend.name()
    );
    let (reply, fallback) = match state.backend.complete(&transcript).await {
        Ok(reply) => (reply, false),
        Err(e) => {
            warn!(
                "Completion failed, using {} fallback: {:#}",
                state.fallback.as_str(),
                e
            );
            (state.fallback.reply(latest_user_text(&transcript)).to_string(), true)
        }
    };

    Json(ChatReply { reply, fallback }).into_response()
}

async fn contact(
    State(state): State<SharedState>,
    payload: Result<Json<ContactForm>, JsonRejection>,
) -> Response {
    let Json(form) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return rejected(rejection),
    };
    match state.relay.send(&form).await {
        Ok(()) => notice(StatusCode::OK, SENT_NOTICE),
        Err(e) => match e.downcast_ref::<ChatterifyError>() {
            Some(invalid @ ChatterifyError::InvalidContactForm(_)) => {
                notice(StatusCode::UNPROCESSABLE_ENTITY, invalid.to_string())
            }
            _ => {
                warn!("Contact relay failed: {:#}", e);
                notice(StatusCode::BAD_GATEWAY, FAILED_NOTICE)
            }
        },
    }
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}
