use thiserror::Error;

use crate::llm::LlmError;

/// Errors from conversation store operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("chat not found")]
    NotFound,

    #[error("storage error: {0}")]
    Storage(String),
}

/// Errors surfaced by the chat orchestrator.
#[derive(Debug, Error)]
pub enum ChatError {
    /// The (user, chat) key is unknown to the store.
    #[error("Chat not found")]
    NotFound,

    /// The completion gateway failed; the user message stays recorded.
    #[error("Error getting AI response: {0}")]
    Upstream(#[from] LlmError),

    #[error(transparent)]
    Storage(RepositoryError),
}

impl From<RepositoryError> for ChatError {
    fn from(e: RepositoryError) -> Self {
        match e {
            RepositoryError::NotFound => ChatError::NotFound,
            other => ChatError::Storage(other),
        }
    }
}
