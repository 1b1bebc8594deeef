//! Chat, identifier, and composite key types.
//!
//! A [`Chat`] is owned by exactly one user and addressed by a [`ChatKey`]
//! (user id + chat id). Identifiers are opaque strings: clients send them back
//! verbatim, so an unknown id must reach the store (and yield "not found")
//! rather than fail to parse.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use std::fmt;

pub use crate::llm::{Message, MessageRole};

/// Opaque identifier of a browser session's user.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub String);

impl UserId {
    /// Generate a fresh random user id (UUID v4).
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for UserId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Opaque identifier of a chat.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChatId(pub String);

impl ChatId {
    /// Generate a fresh random chat id (UUID v4).
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ChatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ChatId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Composite key addressing one chat of one user.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ChatKey {
    pub user_id: UserId,
    pub chat_id: ChatId,
}

impl ChatKey {
    pub fn new(user_id: UserId, chat_id: ChatId) -> Self {
        Self { user_id, chat_id }
    }
}

impl fmt::Display for ChatKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.user_id, self.chat_id)
    }
}

/// A conversation between one user and the assistant.
///
/// The first message is always the system prompt; later messages are kept
/// in strict append order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chat {
    pub id: ChatId,
    pub user_id: UserId,
    pub messages: Vec<Message>,
    pub created_at: DateTime<Utc>,
}

impl Chat {
    /// Create a chat seeded with a single system message.
    pub fn seeded(user_id: UserId, id: ChatId, system_prompt: &str) -> Self {
        Self {
            id,
            user_id,
            messages: vec![Message::system(system_prompt)],
            created_at: Utc::now(),
        }
    }

    /// Number of messages, including the system seed.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_chat_starts_with_system_message() {
        let chat = Chat::seeded(UserId::from("u1"), ChatId::from("c1"), "Be brief.");
        assert_eq!(chat.len(), 1);
        assert_eq!(chat.messages[0].role, MessageRole::System);
        assert_eq!(chat.messages[0].content, "Be brief.");
    }

    #[test]
    fn test_generated_ids_are_unique() {
        assert_ne!(ChatId::generate(), ChatId::generate());
        assert_ne!(UserId::generate(), UserId::generate());
    }

    #[test]
    fn test_ids_serialize_as_plain_strings() {
        let json = serde_json::to_string(&ChatId::from("abc")).unwrap();
        assert_eq!(json, "\"abc\"");
    }

    #[test]
    fn test_chat_key_display() {
        let key = ChatKey::new(UserId::from("u"), ChatId::from("c"));
        assert_eq!(key.to_string(), "u/c");
    }
}
