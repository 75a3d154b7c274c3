//! # Chat Message Records and Transcripts
//!
//! File: cli/src/chat/message.rs
//!
//! ## Overview
//!
//! Two shapes of chat data live here:
//!
//! - `Message`: a record in the conversation store, tagged by who sent it.
//!   Records are immutable once created.
//! - `TranscriptEntry`: the role-tagged `{role, content}` pair sent to the
//!   completion endpoint. A transcript is always derived from the records
//!   on demand and never stored.
//!
//! The projection from records to entries is `build_transcript`: the fixed
//! persona goes first as a `system` entry, then each record in store order
//! (`User` → `user`, `Bot` → `assistant`), then the new user input.
//!
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Greeting placed in every fresh conversation.
pub const GREETING: &str = "Hello! How can I help you today?";

/// System instruction prepended to every transcript.
pub const PERSONA: &str = "You are a helpful AI assistant for Chatterify, a company that provides AI chatbot services. Be friendly, professional, and informative about AI chatbot solutions, features, pricing, and implementation. Keep responses concise and engaging.";

/// Opaque message identity, unique and increasing within one conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct MessageId(i64);

impl MessageId {
    /// Derives an id from `at`, bumped past `previous` so ids never repeat
    /// or go backwards even when two records share a millisecond.
    pub fn next(at: DateTime<Utc>, previous: Option<MessageId>) -> Self {
        let millis = at.timestamp_millis();
        match previous {
            Some(MessageId(last)) if millis <= last => MessageId(last + 1),
            _ => MessageId(millis),
        }
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Payload shared by both kinds of message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Record {
    pub id: MessageId,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

/// One entry in the conversation store. The variant is the sender.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "sender", rename_all = "lowercase")]
pub enum Message {
    User(Record),
    Bot(Record),
}

impl Message {
    pub fn record(&self) -> &Record {
        match self {
            Message::User(record) | Message::Bot(record) => record,
        }
    }

    pub fn text(&self) -> &str {
        &self.record().text
    }

    pub fn id(&self) -> MessageId {
        self.record().id
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.record().timestamp
    }

    pub fn is_user(&self) -> bool {
        matches!(self, Message::User(_))
    }

    /// The transcript entry this record projects to.
    pub fn to_entry(&self) -> TranscriptEntry {
        match self {
            Message::User(record) => TranscriptEntry::user(&record.text),
            Message::Bot(record) => TranscriptEntry::assistant(&record.text),
        }
    }
}

/// Role of a transcript entry on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// A `{role, content}` pair as sent to the completion endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptEntry {
    pub role: Role,
    pub content: String,
}

impl TranscriptEntry {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Builds the transcript for one send: persona, then `history` in order,
/// then `input` as the new user turn.
pub fn build_transcript(persona: &str, history: &[Message], input: &str) -> Vec<TranscriptEntry> {
    let mut transcript = Vec::with_capacity(history.len() + 2);
    transcript.push(TranscriptEntry::system(persona));
    transcript.extend(history.iter().map(Message::to_entry));
    transcript.push(TranscriptEntry::user(input));
    transcript
}
