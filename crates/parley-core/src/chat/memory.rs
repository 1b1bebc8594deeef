//! In-memory conversation store backed by `DashMap`.
//!
//! Chats live for the lifetime of the process. Every read clones out of the
//! map so no `DashMap` guard is ever held across an `.await`.

use std::sync::Arc;

use dashmap::DashMap;

use parley_types::chat::{Chat, ChatKey, Message};
use parley_types::error::RepositoryError;

use super::store::ConversationStore;

/// Process-lifetime chat storage keyed by (user id, chat id).
///
/// Cloning produces a shared view of the same chats (backed by `Arc`).
#[derive(Debug, Clone, Default)]
pub struct InMemoryConversationStore {
    chats: Arc<DashMap<ChatKey, Chat>>,
}

impl InMemoryConversationStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ConversationStore for InMemoryConversationStore {
    async fn create(&self, key: &ChatKey, system_prompt: &str) -> Result<Chat, RepositoryError> {
        let chat = Chat::seeded(key.user_id.clone(), key.chat_id.clone(), system_prompt);
        self.chats.insert(key.clone(), chat.clone());
        Ok(chat)
    }

    async fn get(&self, key: &ChatKey) -> Result<Option<Chat>, RepositoryError> {
        Ok(self.chats.get(key).map(|r| r.value().clone()))
    }

    async fn append_message(&self, key: &ChatKey, message: Message) -> Result<(), RepositoryError> {
        match self.chats.get_mut(key) {
            Some(mut chat) => {
                chat.messages.push(message);
                Ok(())
            }
            None => Err(RepositoryError::NotFound),
        }
    }

    async fn get_history(&self, key: &ChatKey) -> Result<Vec<Message>, RepositoryError> {
        self.chats
            .get(key)
            .map(|r| r.messages.clone())
            .ok_or(RepositoryError::NotFound)
    }

    async fn chat_count(&self) -> Result<usize, RepositoryError> {
        Ok(self.chats.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parley_types::chat::{ChatId, MessageRole, UserId};

    fn key(user: &str, chat: &str) -> ChatKey {
        ChatKey::new(UserId::from(user), ChatId::from(chat))
    }

    #[tokio::test]
    async fn create_seeds_system_message() {
        let store = InMemoryConversationStore::new();
        let k = key("u1", "c1");
        store.create(&k, "Be helpful.").await.unwrap();

        let history = store.get_history(&k).await.unwrap();
        assert_eq!(history, vec![Message::system("Be helpful.")]);
    }

    #[tokio::test]
    async fn create_overwrites_existing_chat() {
        let store = InMemoryConversationStore::new();
        let k = key("u1", "c1");
        store.create(&k, "first").await.unwrap();
        store.append_message(&k, Message::user("hello")).await.unwrap();

        store.create(&k, "second").await.unwrap();
        let history = store.get_history(&k).await.unwrap();
        assert_eq!(history, vec![Message::system("second")]);
        assert_eq!(store.chat_count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn append_preserves_order() {
        let store = InMemoryConversationStore::new();
        let k = key("u1", "c1");
        store.create(&k, "sys").await.unwrap();
        store.append_message(&k, Message::user("one")).await.unwrap();
        store.append_message(&k, Message::assistant("two")).await.unwrap();

        let history = store.get_history(&k).await.unwrap();
        let roles: Vec<MessageRole> = history.iter().map(|m| m.role).collect();
        assert_eq!(
            roles,
            vec![MessageRole::System, MessageRole::User, MessageRole::Assistant]
        );
        assert_eq!(history[2].content, "two");
    }

    #[tokio::test]
    async fn append_to_missing_chat_is_not_found() {
        let store = InMemoryConversationStore::new();
        let err = store
            .append_message(&key("u1", "missing"), Message::user("hi"))
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound));
        assert_eq!(store.chat_count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn get_history_missing_is_not_found() {
        let store = InMemoryConversationStore::new();
        let err = store.get_history(&key("u1", "nope")).await.unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound));
    }

    #[tokio::test]
    async fn chats_are_scoped_to_their_owner() {
        let store = InMemoryConversationStore::new();
        store.create(&key("alice", "c1"), "sys").await.unwrap();

        assert!(store.get(&key("alice", "c1")).await.unwrap().is_some());
        assert!(store.get(&key("bob", "c1")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn clone_shares_chats() {
        let store = InMemoryConversationStore::new();
        let view = store.clone();
        store.create(&key("u1", "c1"), "sys").await.unwrap();
        assert_eq!(view.chat_count().await.unwrap(), 1);
    }
}
