//! CompletionGateway trait definition.
//!
//! The boundary to the remote language-model API. Uses RPITIT for
//! `complete`; see `BoxCompletionGateway` for the type-erased form.

use parley_types::llm::{CompletionResponse, LlmError, Message};

/// Trait for chat-completion backends.
///
/// A gateway makes exactly one attempt per call: no retries, no streaming.
/// Implementations live in parley-infra (e.g., `OpenAiCompatibleGateway`).
pub trait CompletionGateway: Send + Sync {
    /// Human-readable provider name (e.g., "openai-compatible").
    fn name(&self) -> &str;

    /// Send the ordered conversation and receive the assistant's reply.
    fn complete(
        &self,
        messages: &[Message],
    ) -> impl std::future::Future<Output = Result<CompletionResponse, LlmError>> + Send;
}
