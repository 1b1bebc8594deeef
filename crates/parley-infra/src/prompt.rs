//! System prompt loading.

use std::path::Path;

/// Prompt used when the configured prompt file cannot be read.
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful assistant.";

/// Read the system prompt from `path`, verbatim.
///
/// Any read failure (missing file, permissions, invalid UTF-8) logs a warning
/// and yields [`DEFAULT_SYSTEM_PROMPT`].
pub async fn load_system_prompt(path: &Path) -> String {
    match tokio::fs::read_to_string(path).await {
        Ok(prompt) => {
            tracing::debug!(path = %path.display(), bytes = prompt.len(), "Loaded system prompt");
            prompt
        }
        Err(err) => {
            tracing::warn!(
                "Failed to load system prompt from {}: {err}, using default",
                path.display()
            );
            DEFAULT_SYSTEM_PROMPT.to_string()
        }
    }
}
