//! ConversationStore trait definition.
//!
//! Chats are addressed by [`ChatKey`] (user id + chat id), so one user can
//! never read or append to another user's chat.

use parley_types::chat::{Chat, ChatKey, Message};
use parley_types::error::RepositoryError;

/// Storage for chats and their ordered message history.
///
/// Uses native async fn in traits (RPITIT, Rust 2024 edition). The only
/// implementation today is in-memory; a persistent backend would slot in
/// behind the same trait.
pub trait ConversationStore: Send + Sync {
    /// Insert a new chat seeded with one system message.
    ///
    /// An existing chat under the same key is replaced.
    fn create(
        &self,
        key: &ChatKey,
        system_prompt: &str,
    ) -> impl std::future::Future<Output = Result<Chat, RepositoryError>> + Send;

    /// Get a snapshot of a chat, or `None` if the key is unknown.
    fn get(
        &self,
        key: &ChatKey,
    ) -> impl std::future::Future<Output = Result<Option<Chat>, RepositoryError>> + Send;

    /// Append a message to the end of a chat's history.
    ///
    /// Returns `RepositoryError::NotFound` if the chat does not exist.
    fn append_message(
        &self,
        key: &ChatKey,
        message: Message,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Get the full ordered history of a chat.
    ///
    /// Returns `RepositoryError::NotFound` if the chat does not exist.
    fn get_history(
        &self,
        key: &ChatKey,
    ) -> impl std::future::Future<Output = Result<Vec<Message>, RepositoryError>> + Send;

    /// Number of chats currently held.
    fn chat_count(
        &self,
    ) -> impl std::future::Future<Output = Result<usize, RepositoryError>> + Send;
}
