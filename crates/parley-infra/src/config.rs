//! Configuration loader for Parley.
//!
//! Reads `parley.toml` into [`AppConfig`], then applies environment
//! overrides. A missing or malformed file falls back to defaults so the
//! server always starts.

use std::path::Path;

use secrecy::SecretString;
use uuid::Uuid;

use parley_types::config::AppConfig;

/// Environment variable names recognized by Parley.
pub mod env {
    pub const HOST: &str = "PARLEY_HOST";
    pub const PORT: &str = "PARLEY_PORT";
    pub const API_BASE_URL: &str = "PARLEY_API_BASE_URL";
    pub const MODEL: &str = "PARLEY_MODEL";
    pub const SYSTEM_PROMPT: &str = "PARLEY_SYSTEM_PROMPT";
    pub const API_KEY: &str = "PARLEY_API_KEY";
    pub const LEGACY_API_KEY: &str = "A4F_API_KEY";
    pub const SESSION_SECRET: &str = "PARLEY_SESSION_SECRET";
}

/// Load configuration from `path`, then apply process environment overrides.
pub async fn load_config(path: &Path) -> AppConfig {
    let config = load_config_file(path).await;
    apply_env_overrides(config, |name| std::env::var(name).ok())
}

/// Load configuration from `path` without consulting the environment.
///
/// - If the file does not exist, returns [`AppConfig::default()`].
/// - If the file exists but fails to read or parse, logs a warning and returns the default.
pub async fn load_config_file(path: &Path) -> AppConfig {
    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config file at {}, using defaults", path.display());
            return AppConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", path.display());
            return AppConfig::default();
        }
    };

    match toml::from_str::<AppConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!("Failed to parse {}: {err}, using defaults", path.display());
            AppConfig::default()
        }
    }
}

/// Apply environment overrides on top of file values.
///
/// `lookup` resolves a variable name to its value; empty values are ignored.
pub fn apply_env_overrides<F>(mut config: AppConfig, lookup: F) -> AppConfig
where
    F: Fn(&str) -> Option<String>,
{
    let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

    if let Some(host) = get(env::HOST) {
        config.server.host = host;
    }
    if let Some(port) = get(env::PORT) {
        match port.trim().parse::<u16>() {
            Ok(port) => config.server.port = port,
            Err(err) => {
                tracing::warn!("Ignoring invalid {}={port:?}: {err}", env::PORT);
            }
        }
    }
    if let Some(base_url) = get(env::API_BASE_URL) {
        config.completion.base_url = base_url;
    }
    if let Some(model) = get(env::MODEL) {
        config.completion.model = model;
    }
    if let Some(prompt_path) = get(env::SYSTEM_PROMPT) {
        config.system_prompt_path = prompt_path;
    }

    config
}

/// Resolve the completion API key.
///
/// Prefers `PARLEY_API_KEY`, then `A4F_API_KEY`. A missing key is not fatal:
/// the gateway will be rejected by the provider, which surfaces as an
/// upstream error per request.
pub fn resolve_api_key<F>(lookup: F) -> SecretString
where
    F: Fn(&str) -> Option<String>,
{
    let key = lookup(env::API_KEY)
        .filter(|v| !v.is_empty())
        .or_else(|| lookup(env::LEGACY_API_KEY).filter(|v| !v.is_empty()));

    match key {
        Some(key) => SecretString::from(key),
        None => {
            tracing::warn!(
                "Neither {} nor {} is set; completion requests will fail authentication",
                env::API_KEY,
                env::LEGACY_API_KEY
            );
            SecretString::from(String::new())
        }
    }
}

/// Resolve the session cookie signing secret.
///
/// Without `PARLEY_SESSION_SECRET` a random per-process secret is generated,
/// so sessions do not survive a restart.
pub fn resolve_session_secret<F>(lookup: F) -> SecretString
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(env::SESSION_SECRET).filter(|v| !v.is_empty()) {
        Some(secret) => SecretString::from(secret),
        None => {
            tracing::warn!(
                "{} is not set; using a random secret, sessions will not survive restarts",
                env::SESSION_SECRET
            );
            let random = format!("{}{}", Uuid::new_v4().simple(), Uuid::new_v4().simple());
            SecretString::from(random)
        }
    }
}
