//! Application state wiring all services together.
//!
//! `ChatService` is generic over its store and gateway; `AppState` pins it
//! to the in-memory store and a type-erased gateway so tests can swap in a
//! stub without changing the handler types.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;

use parley_core::chat::memory::InMemoryConversationStore;
use parley_core::chat::service::ChatService;
use parley_core::llm::box_gateway::BoxCompletionGateway;
use parley_core::llm::gateway::CompletionGateway;
use parley_infra::config::{resolve_api_key, resolve_session_secret};
use parley_infra::llm::openai_compat::OpenAiCompatibleGateway;
use parley_infra::llm::openai_compat::config::OpenAiCompatConfig;
use parley_infra::prompt::load_system_prompt;
use parley_types::config::AppConfig;

use crate::http::extractors::session::SessionSigner;

pub type ConcreteChatService = ChatService<InMemoryConversationStore, BoxCompletionGateway>;

/// Shared state handed to every request handler.
#[derive(Clone)]
pub struct AppState {
    pub chat_service: Arc<ConcreteChatService>,
    pub sessions: Arc<SessionSigner>,
    pub static_dir: PathBuf,
}

impl AppState {
    /// Assemble state from already-built parts.
    pub fn new(
        chat_service: ConcreteChatService,
        sessions: SessionSigner,
        static_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            chat_service: Arc::new(chat_service),
            sessions: Arc::new(sessions),
            static_dir: static_dir.into(),
        }
    }

    /// Build production state: real gateway, one process-wide store,
    /// system prompt from disk, secrets from the environment.
    pub async fn init(config: &AppConfig) -> anyhow::Result<Self> {
        let gateway = build_gateway(config)?;
        let system_prompt = load_system_prompt(Path::new(&config.system_prompt_path)).await;

        let session_secret = resolve_session_secret(|name| std::env::var(name).ok());
        let sessions = SessionSigner::new(&session_secret, config.session.cookie_name.as_str())?;

        tracing::info!(
            gateway = gateway.name(),
            model = %config.completion.model,
            base_url = %config.completion.base_url,
            "Chat service ready"
        );

        let chat_service = ChatService::new(InMemoryConversationStore::new(), gateway, system_prompt);
        Ok(Self::new(chat_service, sessions, &config.server.static_dir))
    }
}

/// Build the OpenAI-compatible gateway from config plus the API key in the environment.
pub fn build_gateway(config: &AppConfig) -> anyhow::Result<BoxCompletionGateway> {
    let gateway = build_openai_gateway(config)?;
    Ok(BoxCompletionGateway::new(gateway))
}

pub(crate) fn build_openai_gateway(config: &AppConfig) -> anyhow::Result<OpenAiCompatibleGateway> {
    let api_key = resolve_api_key(|name| std::env::var(name).ok());
    let gateway_config = OpenAiCompatConfig::from_completion(&config.completion, api_key);
    OpenAiCompatibleGateway::new(gateway_config).context("failed to build completion gateway")
}
