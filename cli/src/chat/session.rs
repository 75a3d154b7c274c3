//! # Chat Widget Controller
//!
//! File: cli/src/chat/session.rs
//!
//! ## Overview
//!
//! `ChatSession` owns one conversation and the widget state around it. The
//! host (the terminal widget, a test, an HTTP handler) constructs it
//! explicitly and drives it with actions: open, close, reset, input and
//! submit.
//!
//! ## State Machine
//!
//! ```text
//!   closed ──open──▶ open-idle ──submit (non-blank)──▶ open-awaiting-response
//!     ▲                 │  ▲                                   │
//!     └─────close───────┘  └──────── complete (ok or err) ─────┘
//! ```
//!
//! - Submit is ignored when the trimmed input is blank, when the widget is
//!   closed, and while a reply is outstanding.
//! - Close is allowed from any state and keeps the history.
//! - Every completion appends exactly one bot record: the reply on success,
//!   the fallback text on failure. Errors are logged, never shown.
//!
//! ## Rounds and Stale Replies
//!
//! A round has two halves so an event loop can keep handling input while
//! the call is in flight: `submit` hands back a `PendingRound` with the
//! transcript to send, and `complete` takes its `RoundTicket` back with the
//! outcome. Each reset starts a new generation; a ticket minted before the
//! reset is discarded on completion instead of writing into the fresh
//! conversation. `send` runs both halves for callers that just await.
//!
use super::backend::CompletionBackend;
use super::fallback::FallbackPolicy;
use super::message::{build_transcript, Message, TranscriptEntry, PERSONA};
use super::store::{ConversationStore, Sender};
use crate::core::error::Result;
use tracing::{debug, info, warn};

/// Observable widget state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidgetState {
    Closed,
    OpenIdle,
    OpenAwaitingResponse,
}

/// Proof that a round was started, returned to `complete`.
#[derive(Debug, PartialEq, Eq)]
pub struct RoundTicket {
    generation: u64,
}

/// A submitted round whose reply has not arrived yet.
#[derive(Debug)]
pub struct PendingRound {
    pub ticket: RoundTicket,
    pub transcript: Vec<TranscriptEntry>,
}

#[derive(Debug)]
pub struct ChatSession {
    store: ConversationStore,
    input: String,
    open: bool,
    awaiting: bool,
    generation: u64,
    fallback: FallbackPolicy,
}

impl ChatSession {
    /// A closed session holding the greeting.
    pub fn new(fallback: FallbackPolicy) -> Self {
        Self {
            store: ConversationStore::new(),
            input: String::new(),
            open: false,
            awaiting: false,
            generation: 0,
            fallback,
        }
    }

    pub fn state(&self) -> WidgetState {
        match (self.open, self.awaiting) {
            (false, _) => WidgetState::Closed,
            (true, false) => WidgetState::OpenIdle,
            (true, true) => WidgetState::OpenAwaitingResponse,
        }
    }

    pub fn messages(&self) -> &[Message] {
        self.store.list()
    }

    /// True while a reply is outstanding, even if the widget was closed.
    pub fn is_typing(&self) -> bool {
        self.awaiting
    }

    pub fn fallback(&self) -> FallbackPolicy {
        self.fallback
    }

    pub fn open(&mut self) {
        if !self.open {
            debug!("Chat widget opened");
            self.open = true;
        }
    }

    pub fn close(&mut self) {
        if self.open {
            debug!("Chat widget closed ({} messages kept)", self.store.list().len());
            self.open = false;
        }
    }

    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    /// Starts a new conversation. Any outstanding reply becomes stale.
    pub fn reset(&mut self) {
        if !self.open {
            return;
        }
        if self.awaiting {
            info!("Conversation reset while awaiting a reply; the reply will be discarded");
        }
        self.store.reset();
        self.input.clear();
        self.awaiting = false;
        self.generation += 1;
    }

    /// Begins a round from the current input.
    ///
    /// Returns `None` (and changes nothing) when the widget is closed, a
    /// reply is outstanding, or the trimmed input is empty.
    pub fn submit(&mut self) -> Option<PendingRound> {
        if !self.open || self.awaiting {
            debug!("Submit ignored in state {:?}", self.state());
            return None;
        }
        let text = self.input.trim();
        if text.is_empty() {
            return None;
        }
        let text = text.to_string();

        let transcript = build_transcript(PERSONA, self.store.list(), &text);
        self.store.append(Sender::User, text);
        self.input.clear();
        self.awaiting = true;

        Some(PendingRound {
            ticket: RoundTicket {
                generation: self.generation,
            },
            transcript,
        })
    }

    /// Finishes a round and returns the bot record it appended, or `None`
    /// when the ticket predates a reset.
    ///
    /// While a round is outstanding no other user record can be appended,
    /// so the store's last user text is the question this round asked.
    pub fn complete(&mut self, ticket: RoundTicket, outcome: Result<String>) -> Option<&Message> {
        if ticket.generation != self.generation || !self.awaiting {
            debug!(
                "Discarding stale reply (ticket generation {}, current {})",
                ticket.generation, self.generation
            );
            return None;
        }

        let text = match outcome {
            Ok(text) => text,
            Err(e) => {
                warn!("Completion failed, using {} fallback: {:#}", self.fallback.as_str(), e);
                self.fallback.reply(self.store.last_user_text()).to_string()
            }
        };

        self.awaiting = false;
        Some(self.store.append(Sender::Bot, text))
    }

    /// Submits the current input and awaits `backend` for the reply.
    pub async fn send(&mut self, backend: &dyn CompletionBackend) -> Option<&Message> {
        let PendingRound { ticket, transcript } = self.submit()?;
        debug!("Requesting reply from {} backend", backend.name());
        let outcome = backend.complete(&transcript).await;
        self.complete(ticket, outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::fallback::{APOLOGY, GRATITUDE_REPLY, PRICING_REPLY};
    use crate::chat::message::GREETING;
    use anyhow::anyhow;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Backend that records transcripts and replies from a script.
    struct ScriptedBackend {
        replies: Mutex<Vec<Result<String>>>,
        seen: Mutex<Vec<Vec<TranscriptEntry>>>,
    }

    impl ScriptedBackend {
        fn new(replies: Vec<Result<String>>) -> Self {
            Self {
                replies: Mutex::new(replies.into_iter().rev().collect()),
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl CompletionBackend for ScriptedBackend {
        async fn complete(&self, transcript: &[TranscriptEntry]) -> Result<String> {
            self.seen.lock().unwrap().push(transcript.to_vec());
            self.replies
                .lock()
                .unwrap()
                .pop()
                .unwrap_or_else(|| Err(anyhow!("script exhausted")))
        }

        fn name(&self) -> &'static str {
            "scripted"
        }
    }

    fn open_session() -> ChatSession {
        let mut session = ChatSession::new(FallbackPolicy::Apology);
        session.open();
        session
    }

    #[test]
    fn starts_closed_with_greeting() {
        let session = ChatSession::new(FallbackPolicy::Apology);
        assert_eq!(session.state(), WidgetState::Closed);
        assert_eq!(session.messages().len(), 1);
        assert_eq!(session.messages()[0].text(), GREETING);
    }

    #[tokio::test]
    async fn each_round_adds_exactly_two_records() {
        let backend = ScriptedBackend::new(vec![
            Ok("one".into()),
            Err(anyhow!("network down")),
            Ok("three".into()),
        ]);
        let mut session = open_session();

        for (i, input) in ["a", "b", "c"].iter().enumerate() {
            let before = session.messages().len();
            session.set_input(*input);
            assert!(session.send(&backend).await.is_some());
            assert_eq!(session.messages().len(), before + 2, "round {}", i);
        }
        assert_eq!(session.state(), WidgetState::OpenIdle);
    }

    #[tokio::test]
    async fn blank_input_is_a_no_op() {
        let backend = ScriptedBackend::new(vec![]);
        let mut session = open_session();

        session.set_input("   \t ");
        assert!(session.send(&backend).await.is_none());
        assert_eq!(session.messages().len(), 1);
        assert!(backend.seen.lock().unwrap().is_empty());
    }

    #[test]
    fn submit_trims_and_clears_input() {
        let mut session = open_session();
        session.set_input("  hello  ");

        let round = session.submit().expect("round should start");

        assert!(session.is_typing());
        assert_eq!(session.state(), WidgetState::OpenAwaitingResponse);
        assert_eq!(session.messages().last().unwrap().text(), "hello");
        assert_eq!(round.transcript.last().unwrap().content, "hello");

        // Nothing left to resend once the reply lands.
        session.complete(round.ticket, Ok("hi".into()));
        assert!(session.submit().is_none());
    }

    #[test]
    fn second_submit_while_awaiting_is_ignored() {
        let mut session = open_session();
        session.set_input("first");
        let round = session.submit().unwrap();

        session.set_input("second");
        assert!(session.submit().is_none());
        assert_eq!(session.messages().len(), 2);

        session.complete(round.ticket, Ok("reply".into()));
        assert_eq!(session.messages().len(), 3);
        assert_eq!(session.state(), WidgetState::OpenIdle);
        assert!(!session.is_typing());
    }

    #[tokio::test]
    async fn failure_appends_exact_apology() {
        let backend = ScriptedBackend::new(vec![Err(anyhow!("HTTP 500"))]);
        let mut session = open_session();
        session.set_input("anything");

        let reply = session.send(&backend).await.unwrap();
        assert!(matches!(reply, Message::Bot(r) if r.text == "Sorry, I encountered an error. Please try again."));
        assert_eq!(APOLOGY, "Sorry, I encountered an error. Please try again.");
    }

    #[tokio::test]
    async fn canned_policy_answers_from_table_on_failure() {
        let backend = ScriptedBackend::new(vec![Err(anyhow!("timeout"))]);
        let mut session = ChatSession::new(FallbackPolicy::Canned);
        session.open();
        session.set_input("what does it cost?");

        let reply = session.send(&backend).await.unwrap();
        assert_eq!(reply.text(), PRICING_REPLY);
    }

    #[tokio::test]
    async fn transcript_projects_history_in_order() {
        let backend = ScriptedBackend::new(vec![Ok("Hello!".into()), Ok("From $99.".into())]);
        let mut session = open_session();

        session.set_input("Hi");
        session.send(&backend).await;
        session.set_input("price?");
        session.send(&backend).await;

        let seen = backend.seen.lock().unwrap();
        assert_eq!(
            seen[1],
            vec![
                TranscriptEntry::system(PERSONA),
                TranscriptEntry::assistant(GREETING),
                TranscriptEntry::user("Hi"),
                TranscriptEntry::assistant("Hello!"),
                TranscriptEntry::user("price?"),
            ]
        );
    }

    #[test]
    fn reset_leaves_single_greeting_and_empty_input() {
        let mut session = open_session();
        session.set_input("hello");
        let round = session.submit().unwrap();
        session.complete(round.ticket, Ok("hi!".into()));
        session.set_input("draft");

        session.reset();

        assert_eq!(session.messages().len(), 1);
        assert!(matches!(&session.messages()[0], Message::Bot(r) if r.text == GREETING));
        assert_eq!(session.state(), WidgetState::OpenIdle);
        // The draft went with the old conversation.
        assert!(session.submit().is_none());
    }

    #[test]
    fn reply_after_reset_is_discarded() {
        let mut session = open_session();
        session.set_input("hello");
        let round = session.submit().unwrap();

        session.reset();
        assert!(!session.is_typing());

        let appended = session.complete(round.ticket, Ok("late".into()));
        assert!(appended.is_none());
        assert_eq!(session.messages().len(), 1);
        assert_eq!(session.messages()[0].text(), GREETING);
    }

    #[test]
    fn new_round_after_reset_is_not_confused_with_stale_one() {
        let mut session = open_session();
        session.set_input("old");
        let stale = session.submit().unwrap();
        session.reset();

        session.set_input("new");
        let fresh = session.submit().unwrap();

        assert!(session.complete(stale.ticket, Ok("late".into())).is_none());
        assert!(session.is_typing());
        assert!(session.complete(fresh.ticket, Ok("fresh".into())).is_some());
        let texts: Vec<&str> = session.messages().iter().map(Message::text).collect();
        assert_eq!(texts, vec![GREETING, "new", "fresh"]);
    }

    #[test]
    fn reply_while_closed_is_kept_for_reopen() {
        let mut session = open_session();
        session.set_input("hello");
        let round = session.submit().unwrap();

        session.close();
        assert_eq!(session.state(), WidgetState::Closed);
        session.complete(round.ticket, Ok("welcome".into()));

        session.open();
        assert_eq!(session.state(), WidgetState::OpenIdle);
        assert_eq!(session.messages().len(), 3);
        assert_eq!(session.messages()[2].text(), "welcome");
    }

    #[test]
    fn closed_widget_ignores_submit_and_reset() {
        let mut session = ChatSession::new(FallbackPolicy::Apology);
        session.set_input("hello");
        assert!(session.submit().is_none());
        session.reset();
        assert_eq!(session.messages().len(), 1);

        // The draft survives the ignored reset.
        session.open();
        let round = session.submit().unwrap();
        assert_eq!(round.transcript.last().unwrap().content, "hello");
    }

    #[tokio::test]
    async fn canned_fallback_answers_the_round_question_not_older_ones() {
        let backend = ScriptedBackend::new(vec![Ok("fine".into()), Err(anyhow!("down"))]);
        let mut session = ChatSession::new(FallbackPolicy::Canned);
        session.open();

        session.set_input("what does it cost");
        session.send(&backend).await;
        session.set_input("thanks");
        let reply = session.send(&backend).await.unwrap();
        assert_eq!(reply.text(), GRATITUDE_REPLY);
    }
}
