//! Configuration for the OpenAI-compatible completion gateway.

use std::time::Duration;

use secrecy::SecretString;

use parley_types::config::CompletionConfig;

/// Everything needed to construct an [`super::OpenAiCompatibleGateway`].
///
/// Does not derive Debug; the API key must never reach log output.
pub struct OpenAiCompatConfig {
    /// Human-readable provider name used in logs.
    pub provider_name: String,
    /// Base URL for the API (e.g., "https://api.a4f.co/v1"), no trailing slash required.
    pub base_url: String,
    pub api_key: SecretString,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    /// `None` waits for the provider indefinitely.
    pub request_timeout: Option<Duration>,
}

impl OpenAiCompatConfig {
    /// Build a gateway configuration from the `[completion]` section.
    pub fn from_completion(completion: &CompletionConfig, api_key: SecretString) -> Self {
        Self {
            provider_name: "openai-compatible".to_string(),
            base_url: completion.base_url.clone(),
            api_key,
            model: completion.model.clone(),
            temperature: completion.temperature,
            max_tokens: completion.max_tokens,
            request_timeout: completion.request_timeout_secs.map(Duration::from_secs),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn from_completion_copies_fixed_parameters() {
        let completion = CompletionConfig {
            request_timeout_secs: Some(12),
            ..CompletionConfig::default()
        };
        let config = OpenAiCompatConfig::from_completion(&completion, SecretString::from("k"));

        assert_eq!(config.base_url, "https://api.a4f.co/v1");
        assert_eq!(config.model, "provider-6/gpt-oss-20b");
        assert_eq!(config.max_tokens, 300);
        assert_eq!(config.request_timeout, Some(Duration::from_secs(12)));
        assert_eq!(config.api_key.expose_secret(), "k");
    }

    #[test]
    fn no_timeout_by_default() {
        let config =
            OpenAiCompatConfig::from_completion(&CompletionConfig::default(), SecretString::from(""));
        assert!(config.request_timeout.is_none());
    }
}
