//! # Conversation Store
//!
//! File: cli/src/chat/store.rs
//!
//! In-memory, append-only list of chat records for one session. The only
//! way to remove anything is `reset`, which swaps the whole list for a single
//! fresh greeting. Insertion order is display order and transcript order.
//!
use super::message::{Message, MessageId, Record, GREETING};
use chrono::Utc;

/// Which side authored a record being appended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sender {
    User,
    Bot,
}

#[derive(Debug, Clone)]
pub struct ConversationStore {
    messages: Vec<Message>,
}

impl ConversationStore {
    /// A store seeded with the greeting record.
    pub fn new() -> Self {
        let mut store = Self {
            messages: Vec::new(),
        };
        store.append(Sender::Bot, GREETING);
        store
    }

    /// Appends one record stamped with the current time and returns it.
    pub fn append(&mut self, sender: Sender, text: impl Into<String>) -> &Message {
        let now = Utc::now();
        let record = Record {
            id: MessageId::next(now, self.messages.last().map(Message::id)),
            text: text.into(),
            timestamp: now,
        };
        let message = match sender {
            Sender::User => Message::User(record),
            Sender::Bot => Message::Bot(record),
        };
        self.messages.push(message);
        &self.messages[self.messages.len() - 1]
    }

    /// Replaces every record with a single fresh greeting.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    pub fn list(&self) -> &[Message] {
        &self.messages
    }

    /// Text of the most recent user record, or `""` if there is none.
    /// The canned fallback answers this.
    pub fn last_user_text(&self) -> &str {
        self.messages
            .iter()
            .rev()
            .find(|m| m.is_user())
            .map(Message::text)
            .unwrap_or("")
    }
}

impl Default for ConversationStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_store_holds_only_greeting() {
        let store = ConversationStore::new();
        assert_eq!(store.list().len(), 1);
        assert!(matches!(&store.list()[0], Message::Bot(r) if r.text == GREETING));
    }

    #[test]
    fn append_preserves_insertion_order() {
        let mut store = ConversationStore::new();
        store.append(Sender::User, "first");
        store.append(Sender::Bot, "second");
        store.append(Sender::User, "third");

        let texts: Vec<&str> = store.list().iter().map(Message::text).collect();
        assert_eq!(texts, vec![GREETING, "first", "second", "third"]);

        let ids: Vec<MessageId> = store.list().iter().map(Message::id).collect();
        assert!(ids.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn reset_replaces_everything_with_greeting() {
        let mut store = ConversationStore::new();
        store.append(Sender::User, "hello");
        store.append(Sender::Bot, "hi there");

        store.reset();

        assert_eq!(store.list().len(), 1);
        assert!(matches!(&store.list()[0], Message::Bot(r) if r.text == GREETING));
    }

    #[test]
    fn last_user_text_skips_bot_records() {
        let mut store = ConversationStore::new();
        assert_eq!(store.last_user_text(), "");

        store.append(Sender::User, "what does it cost");
        store.append(Sender::Bot, "It depends.");
        assert_eq!(store.last_user_text(), "what does it cost");
    }
}
