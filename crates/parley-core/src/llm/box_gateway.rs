//! BoxCompletionGateway -- object-safe dynamic dispatch wrapper for CompletionGateway.
//!
//! 1. `CompletionGatewayDyn` is an object-safe mirror with boxed futures
//! 2. Blanket impl of `CompletionGatewayDyn` for all `T: CompletionGateway`
//! 3. `BoxCompletionGateway` holds `Box<dyn CompletionGatewayDyn>` and
//!    implements `CompletionGateway` itself, so it plugs into `ChatService`

use std::future::Future;
use std::pin::Pin;

use parley_types::llm::{CompletionResponse, LlmError, Message};

use super::gateway::CompletionGateway;

/// Object-safe version of [`CompletionGateway`] with boxed futures.
pub trait CompletionGatewayDyn: Send + Sync {
    fn name(&self) -> &str;

    fn complete_boxed<'a>(
        &'a self,
        messages: &'a [Message],
    ) -> Pin<Box<dyn Future<Output = Result<CompletionResponse, LlmError>> + Send + 'a>>;
}

impl<T: CompletionGateway> CompletionGatewayDyn for T {
    fn name(&self) -> &str {
        CompletionGateway::name(self)
    }

    fn complete_boxed<'a>(
        &'a self,
        messages: &'a [Message],
    ) -> Pin<Box<dyn Future<Output = Result<CompletionResponse, LlmError>> + Send + 'a>> {
        Box::pin(self.complete(messages))
    }
}

/// Type-erased completion gateway.
///
/// Lets the HTTP state hold one concrete service type whether the gateway
/// underneath is the real HTTP client or a test stub.
pub struct BoxCompletionGateway {
    inner: Box<dyn CompletionGatewayDyn>,
}

impl BoxCompletionGateway {
    /// Wrap a concrete `CompletionGateway` in a type-erased box.
    pub fn new<T: CompletionGateway + 'static>(gateway: T) -> Self {
        Self {
            inner: Box::new(gateway),
        }
    }
}

impl CompletionGateway for BoxCompletionGateway {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn complete(
        &self,
        messages: &[Message],
    ) -> impl Future<Output = Result<CompletionResponse, LlmError>> + Send {
        async move { self.inner.complete_boxed(messages).await }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parley_types::llm::Usage;

    struct FixedGateway;

    impl CompletionGateway for FixedGateway {
        fn name(&self) -> &str {
            "fixed"
        }

        async fn complete(&self, messages: &[Message]) -> Result<CompletionResponse, LlmError> {
            Ok(CompletionResponse {
                id: "resp-1".to_string(),
                content: format!("saw {} messages", messages.len()),
                model: "fixed-model".to_string(),
                usage: Usage::default(),
            })
        }
    }

    #[tokio::test]
    async fn boxed_gateway_delegates_to_inner() {
        let gateway = BoxCompletionGateway::new(FixedGateway);
        assert_eq!(CompletionGateway::name(&gateway), "fixed");

        let messages = vec![Message::system("sys"), Message::user("hi")];
        let response = gateway.complete(&messages).await.unwrap();
        assert_eq!(response.content, "saw 2 messages");
        assert_eq!(response.model, "fixed-model");
    }
}
