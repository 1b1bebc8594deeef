//! Chat service orchestrating one conversational turn.
//!
//! A turn runs `lookup -> record user message -> complete -> record reply`.
//! Turns on the same chat are serialized by a per-chat async lock so the
//! history always alternates user/assistant after the system seed; turns
//! on different chats run in parallel.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use parley_types::chat::{ChatId, ChatKey, Message, UserId};
use parley_types::error::ChatError;

use crate::chat::store::ConversationStore;
use crate::llm::gateway::CompletionGateway;

/// Orchestrates chat creation and message turns.
///
/// Generic over `ConversationStore` and `CompletionGateway` so parley-core
/// never depends on parley-infra.
pub struct ChatService<S: ConversationStore, G: CompletionGateway> {
    store: S,
    gateway: G,
    system_prompt: String,
    turn_locks: DashMap<ChatKey, Arc<Mutex<()>>>,
}

impl<S: ConversationStore, G: CompletionGateway> ChatService<S, G> {
    /// Create a chat service. Every new chat is seeded with `system_prompt`.
    pub fn new(store: S, gateway: G, system_prompt: impl Into<String>) -> Self {
        Self {
            store,
            gateway,
            system_prompt: system_prompt.into(),
            turn_locks: DashMap::new(),
        }
    }

    /// Access the conversation store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Access the completion gateway.
    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    /// Start a new chat for `user_id` and return its generated identifier.
    pub async fn start_chat(&self, user_id: &UserId) -> Result<ChatId, ChatError> {
        let chat_id = ChatId::generate();
        let key = ChatKey::new(user_id.clone(), chat_id.clone());
        self.store.create(&key, &self.system_prompt).await?;

        info!(user_id = %user_id, chat_id = %chat_id, "Chat created");
        Ok(chat_id)
    }

    /// Send a user message and return the assistant's reply.
    ///
    /// Fails with `ChatError::NotFound` (store untouched) when the chat does
    /// not exist. On gateway failure the user message stays in history and
    /// `ChatError::Upstream` is returned.
    pub async fn send(
        &self,
        user_id: &UserId,
        chat_id: &ChatId,
        text: &str,
    ) -> Result<String, ChatError> {
        let key = ChatKey::new(user_id.clone(), chat_id.clone());

        if self.store.get(&key).await?.is_none() {
            warn!(chat = %key, "Message sent to unknown chat");
            return Err(ChatError::NotFound);
        }

        let lock = self.turn_lock(&key);
        let _turn = lock.lock().await;

        self.store.append_message(&key, Message::user(text)).await?;
        let history = self.store.get_history(&key).await?;

        debug!(
            chat = %key,
            messages = history.len(),
            gateway = self.gateway.name(),
            "Requesting completion"
        );

        let response = match self.gateway.complete(&history).await {
            Ok(response) => response,
            Err(err) => {
                warn!(chat = %key, error = %err, "Completion failed");
                return Err(ChatError::Upstream(err));
            }
        };

        self.store
            .append_message(&key, Message::assistant(response.content.clone()))
            .await?;

        info!(
            chat = %key,
            model = %response.model,
            input_tokens = response.usage.input_tokens,
            output_tokens = response.usage.output_tokens,
            "Turn completed"
        );

        Ok(response.content)
    }

    /// Full ordered history of a chat.
    pub async fn history(
        &self,
        user_id: &UserId,
        chat_id: &ChatId,
    ) -> Result<Vec<Message>, ChatError> {
        let key = ChatKey::new(user_id.clone(), chat_id.clone());
        Ok(self.store.get_history(&key).await?)
    }

    /// Number of chats held by the store.
    pub async fn chat_count(&self) -> Result<usize, ChatError> {
        Ok(self.store.chat_count().await?)
    }

    /// Per-chat turn lock, created on first use.
    ///
    /// The map entry guard is released before the caller awaits the mutex.
    fn turn_lock(&self, key: &ChatKey) -> Arc<Mutex<()>> {
        self.turn_locks.entry(key.clone()).or_default().value().clone()
    }
}
