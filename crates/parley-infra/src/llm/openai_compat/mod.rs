//! OpenAI-compatible completion gateway.
//!
//! [`OpenAiCompatibleGateway`] talks to any endpoint that speaks the OpenAI
//! chat completions protocol (`POST {base}/chat/completions`). Each call
//! makes exactly one HTTP attempt; failures are mapped onto [`LlmError`]
//! and returned immediately.
//!
//! The API key is held as a [`SecretString`] and only exposed when building
//! the `Authorization` header.

pub mod config;
pub mod types;

use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

use parley_core::llm::gateway::CompletionGateway;
use parley_types::llm::{CompletionResponse, LlmError, Message, Usage};

use self::config::OpenAiCompatConfig;
use self::types::{ChatCompletionRequest, ChatCompletionResponse, ModelList};

/// Completion gateway for OpenAI-compatible APIs.
///
/// Does NOT derive Debug, so the API key cannot leak through `{:?}`.
pub struct OpenAiCompatibleGateway {
    client: reqwest::Client,
    provider_name: String,
    base_url: String,
    api_key: SecretString,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

impl OpenAiCompatibleGateway {
    /// Create a gateway from a configuration.
    ///
    /// Fails only if the underlying HTTP client cannot be constructed.
    pub fn new(config: OpenAiCompatConfig) -> Result<Self, LlmError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| LlmError::Transport(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            provider_name: config.provider_name,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key,
            model: config.model,
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        })
    }

    /// The model identifier sent with every request.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Build the full API URL for a given path.
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// List the model ids available at the configured endpoint.
    pub async fn list_models(&self) -> Result<Vec<String>, LlmError> {
        let response = self
            .client
            .get(self.url("/models"))
            .bearer_auth(self.api_key.expose_secret())
            .send()
            .await
            .map_err(map_send_error)?;

        let response = check_status(response).await?;
        let models: ModelList = response
            .json()
            .await
            .map_err(|e| LlmError::Deserialization(format!("failed to parse model list: {e}")))?;

        Ok(models.data.into_iter().map(|m| m.id).collect())
    }
}

impl CompletionGateway for OpenAiCompatibleGateway {
    fn name(&self) -> &str {
        &self.provider_name
    }

    async fn complete(&self, messages: &[Message]) -> Result<CompletionResponse, LlmError> {
        let body = ChatCompletionRequest {
            model: &self.model,
            messages,
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        debug!(
            provider = %self.provider_name,
            model = %self.model,
            messages = messages.len(),
            "Sending chat completion request"
        );

        let response = self
            .client
            .post(self.url("/chat/completions"))
            .bearer_auth(self.api_key.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(map_send_error)?;

        let response = check_status(response).await?;
        let parsed: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| LlmError::Deserialization(format!("failed to parse response: {e}")))?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or(LlmError::EmptyResponse)?;

        let usage = parsed
            .usage
            .map(|u| Usage {
                input_tokens: u.prompt_tokens,
                output_tokens: u.completion_tokens,
            })
            .unwrap_or_default();

        Ok(CompletionResponse {
            id: parsed.id,
            content,
            model: if parsed.model.is_empty() {
                self.model.clone()
            } else {
                parsed.model
            },
            usage,
        })
    }
}

fn map_send_error(err: reqwest::Error) -> LlmError {
    if err.is_timeout() {
        LlmError::Timeout
    } else {
        LlmError::Transport(format!("HTTP request failed: {err}"))
    }
}

/// Map non-2xx responses onto the error taxonomy, passing 2xx through.
async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, LlmError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let error_body = response.text().await.unwrap_or_default();
    Err(match status.as_u16() {
        401 | 403 => LlmError::AuthenticationFailed,
        429 => LlmError::RateLimited,
        code => LlmError::Provider {
            status: code,
            message: error_body,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn make_gateway(base_url: &str) -> OpenAiCompatibleGateway {
        OpenAiCompatibleGateway::new(OpenAiCompatConfig {
            provider_name: "openai-compatible".to_string(),
            base_url: base_url.to_string(),
            api_key: SecretString::from("test-api-key"),
            model: "provider-6/gpt-oss-20b".to_string(),
            temperature: 0.5,
            max_tokens: 300,
            request_timeout: None,
        })
        .unwrap()
    }

    fn conversation() -> Vec<Message> {
        vec![Message::system("Be brief."), Message::user("hello")]
    }

    #[test]
    fn test_url_strips_trailing_slash() {
        let gateway = make_gateway("http://localhost:8080/v1/");
        assert_eq!(
            gateway.url("/chat/completions"),
            "http://localhost:8080/v1/chat/completions"
        );
    }

    #[tokio::test]
    async fn complete_sends_history_and_reads_first_choice() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("authorization", "Bearer test-api-key"))
            .and(body_partial_json(json!({
                "model": "provider-6/gpt-oss-20b",
                "max_tokens": 300,
                "messages": [
                    {"role": "system", "content": "Be brief."},
                    {"role": "user", "content": "hello"}
                ]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "chatcmpl-1",
                "object": "chat.completion",
                "model": "provider-6/gpt-oss-20b",
                "choices": [{
                    "index": 0,
                    "message": {"role": "assistant", "content": "hi"},
                    "finish_reason": "stop"
                }],
                "usage": {"prompt_tokens": 12, "completion_tokens": 1, "total_tokens": 13}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let gateway = make_gateway(&server.uri());
        let response = gateway.complete(&conversation()).await.unwrap();

        assert_eq!(response.content, "hi");
        assert_eq!(response.id, "chatcmpl-1");
        assert_eq!(response.usage.input_tokens, 12);
        assert_eq!(response.usage.output_tokens, 1);
    }

    #[tokio::test]
    async fn unauthorized_maps_to_authentication_failed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(401).set_body_string("invalid key"))
            .mount(&server)
            .await;

        let err = make_gateway(&server.uri())
            .complete(&conversation())
            .await
            .unwrap_err();
        assert!(matches!(err, LlmError::AuthenticationFailed));
    }

    #[tokio::test]
    async fn too_many_requests_maps_to_rate_limited() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(429))
            .mount(&server)
            .await;

        let err = make_gateway(&server.uri())
            .complete(&conversation())
            .await
            .unwrap_err();
        assert!(matches!(err, LlmError::RateLimited));
    }

    #[tokio::test]
    async fn server_error_is_attempted_once() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
            .expect(1)
            .mount(&server)
            .await;

        let err = make_gateway(&server.uri())
            .complete(&conversation())
            .await
            .unwrap_err();
        match err {
            LlmError::Provider { status, message } => {
                assert_eq!(status, 500);
                assert_eq!(message, "upstream exploded");
            }
            other => panic!("expected Provider error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn malformed_body_maps_to_deserialization() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let err = make_gateway(&server.uri())
            .complete(&conversation())
            .await
            .unwrap_err();
        assert!(matches!(err, LlmError::Deserialization(_)));
    }

    #[tokio::test]
    async fn no_choices_maps_to_empty_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"id": "x", "choices": []})),
            )
            .mount(&server)
            .await;

        let err = make_gateway(&server.uri())
            .complete(&conversation())
            .await
            .unwrap_err();
        assert!(matches!(err, LlmError::EmptyResponse));
    }

    #[tokio::test]
    async fn slow_provider_times_out_when_configured() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
            .mount(&server)
            .await;

        let gateway = OpenAiCompatibleGateway::new(OpenAiCompatConfig {
            provider_name: "openai-compatible".to_string(),
            base_url: server.uri(),
            api_key: SecretString::from("test-api-key"),
            model: "m".to_string(),
            temperature: 0.5,
            max_tokens: 10,
            request_timeout: Some(Duration::from_millis(100)),
        })
        .unwrap();

        let err = gateway.complete(&conversation()).await.unwrap_err();
        assert!(matches!(err, LlmError::Timeout));
    }

    #[tokio::test]
    async fn list_models_returns_ids() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/models"))
            .and(header("authorization", "Bearer test-api-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "object": "list",
                "data": [
                    {"id": "provider-6/gpt-oss-20b", "object": "model"},
                    {"id": "provider-3/gpt-4o-mini", "object": "model"}
                ]
            })))
            .mount(&server)
            .await;

        let models = make_gateway(&server.uri()).list_models().await.unwrap();
        assert_eq!(models, vec!["provider-6/gpt-oss-20b", "provider-3/gpt-4o-mini"]);
    }
}
