//! # Static Fallback Responses
//!
//! File: cli/src/chat/fallback.rs
//!
//! ## Overview
//!
//! Locally produced replies for when the completion endpoint cannot be used:
//!
//! - `canned_reply`: a fixed response table keyed on substrings of the
//!   latest user text, checked in priority order.
//! - `CannedResponder`: a `CompletionBackend` that answers every transcript
//!   from the table. Selected with `--offline`.
//! - `FallbackPolicy`: what the chat session appends when a backend fails,
//!   either the fixed apology or the table's reply.
//!
//! Matching is plain substring search on the lower-cased text, so short
//! triggers such as `hi` also fire inside longer words (`this`, `which`).
//!
use super::backend::CompletionBackend;
use super::message::{Role, TranscriptEntry};
use crate::core::error::Result;
use async_trait::async_trait;
use serde::Deserialize;

/// Appended when a round fails and the policy is `Apology`.
pub const APOLOGY: &str = "Sorry, I encountered an error. Please try again.";

pub const GREETING_REPLY: &str = "Hello! Welcome to Chatterify AI Services. We specialize in creating intelligent chatbots for businesses. How can I help you today?";
pub const PRICING_REPLY: &str = "Our pricing starts at $99/month for basic chatbot services. We also offer custom enterprise solutions tailored to your needs. Would you like to schedule a consultation to discuss your requirements?";
pub const FEATURES_REPLY: &str = "Our chatbots include: 24/7 availability, multi-language support, custom training on your data, analytics dashboard, seamless integration with your existing systems, and natural language understanding. Which feature interests you most?";
pub const CONTACT_REPLY: &str = "You can reach us through the Contact page on our website, or email us directly at support@chatterify.in. We typically respond within 24 hours!";
pub const PROCESS_REPLY: &str = "Our process is simple: 1) We analyze your business needs, 2) Design a custom chatbot solution, 3) Train it on your specific data, 4) Deploy and integrate with your platforms. The whole process typically takes 2-4 weeks.";
pub const DEMO_REPLY: &str = "You're chatting with a demo of our AI right now! For a full demo customized to your business, please visit our Contact page to schedule a personalized walkthrough.";
pub const GRATITUDE_REPLY: &str = "You're welcome! Is there anything else I can help you with today?";
pub const PROMOTIONAL_REPLY: &str = "Thank you for your interest in Chatterify! We offer custom AI chatbot solutions for businesses of all sizes. Feel free to ask about our features, pricing, or how we can help automate your customer interactions.";

/// How a trigger group decides whether it matches.
enum Trigger {
    /// Any one of the substrings.
    Any(&'static [&'static str]),
    /// Every one of the substrings.
    All(&'static [&'static str]),
}

impl Trigger {
    fn matches(&self, text: &str) -> bool {
        match self {
            Trigger::Any(terms) => terms.iter().any(|t| text.contains(t)),
            Trigger::All(terms) => terms.iter().all(|t| text.contains(t)),
        }
    }
}

// Priority order matters: the first matching group wins.
const RESPONSE_TABLE: &[(Trigger, &str)] = &[
    (Trigger::Any(&["hello", "hi", "hey"]), GREETING_REPLY),
    (Trigger::Any(&["price", "cost", "pricing"]), PRICING_REPLY),
    (
        Trigger::Any(&["feature", "what can", "capabilities"]),
        FEATURES_REPLY,
    ),
    (Trigger::Any(&["contact", "reach", "talk"]), CONTACT_REPLY),
    (Trigger::All(&["how", "work"]), PROCESS_REPLY),
    (Trigger::Any(&["demo", "try", "test"]), DEMO_REPLY),
    (Trigger::Any(&["thank"]), GRATITUDE_REPLY),
];

/// Picks the canned reply for the latest user text.
pub fn canned_reply(last_user_text: &str) -> &'static str {
    let text = last_user_text.to_lowercase();
    RESPONSE_TABLE
        .iter()
        .find(|(trigger, _)| trigger.matches(&text))
        .map(|(_, reply)| *reply)
        .unwrap_or(PROMOTIONAL_REPLY)
}

/// Content of the last `user` entry, or `""` when there is none.
pub fn latest_user_text(transcript: &[TranscriptEntry]) -> &str {
    transcript
        .iter()
        .rev()
        .find(|entry| entry.role == Role::User)
        .map(|entry| entry.content.as_str())
        .unwrap_or("")
}

/// What to append when a completion round fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FallbackPolicy {
    /// The fixed apology string.
    #[default]
    Apology,
    /// The static table's reply to the latest user text.
    Canned,
}

impl FallbackPolicy {
    /// The text to append for a failed round that asked `last_user_text`.
    pub fn reply(&self, last_user_text: &str) -> &'static str {
        match self {
            FallbackPolicy::Apology => APOLOGY,
            FallbackPolicy::Canned => canned_reply(last_user_text),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FallbackPolicy::Apology => "apology",
            FallbackPolicy::Canned => "canned",
        }
    }
}

/// Backend that answers from the static table and never fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct CannedResponder;

#[async_trait]
impl CompletionBackend for CannedResponder {
    async fn complete(&self, transcript: &[TranscriptEntry]) -> Result<String> {
        Ok(canned_reply(latest_user_text(transcript)).to_string())
    }

    fn name(&self) -> &'static str {
        "canned"
    }
}
