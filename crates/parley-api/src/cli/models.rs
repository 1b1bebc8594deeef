//! `parley models` -- list model ids exposed by the completion endpoint.

use parley_types::config::AppConfig;

use crate::state::build_openai_gateway;

pub async fn list_models(config: &AppConfig) -> anyhow::Result<()> {
    let gateway = build_openai_gateway(config)?;
    let models = gateway
        .list_models()
        .await
        .map_err(|e| anyhow::anyhow!("failed to list models at {}: {e}", config.completion.base_url))?;

    if models.is_empty() {
        println!("No models available at {}", config.completion.base_url);
        return Ok(());
    }

    println!("Available models:");
    for model in models {
        println!("  - {model}");
    }
    Ok(())
}
