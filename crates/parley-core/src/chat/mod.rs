//! Conversation storage and orchestration.
//!
//! - `ConversationStore`: RPITIT trait for chat storage backends
//! - `InMemoryConversationStore`: process-lifetime DashMap implementation
//! - `ChatService`: per-turn orchestration over a store and a gateway

pub mod memory;
pub mod service;
pub mod store;
