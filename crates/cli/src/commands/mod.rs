pub mod config_cmd;
pub mod react;
pub mod reflect;
pub mod tools;

use agentic_config::AppConfig;
use agentic_core::provider::Provider;
use std::sync::Arc;

/// Providers that run locally and need no key.
const KEYLESS_PROVIDERS: &[&str] = &["ollama", "vllm"];

/// Load the config and build the default provider from it.
pub(crate) fn load() -> Result<(AppConfig, Arc<dyn Provider>), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    let has_provider_key = config
        .providers
        .get(&config.default_provider)
        .is_some_and(|p| p.api_key.is_some());
    if !config.has_api_key()
        && !has_provider_key
        && !KEYLESS_PROVIDERS.contains(&config.default_provider.as_str())
    {
        eprintln!();
        eprintln!("  ERROR: No API key configured!");
        eprintln!();
        eprintln!("  Set one of these environment variables:");
        eprintln!("    AGENTIC_API_KEY   (generic)");
        eprintln!("    GROQ_API_KEY      (for Groq, the default provider)");
        eprintln!("    OPENAI_API_KEY    (for OpenAI)");
        eprintln!();
        eprintln!("  Or add it to your config file:");
        eprintln!("    {}", AppConfig::config_dir().join("config.toml").display());
        eprintln!();
        return Err("No API key found. See above for setup instructions.".into());
    }

    let router = agentic_providers::build_from_config(&config);
    let provider = router.default().ok_or("No default provider configured")?;
    tracing::debug!(provider = %provider.name(), "Provider ready");
    Ok((config, provider))
}
