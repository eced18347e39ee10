//! `agentic config`: configuration management commands.

use agentic_config::AppConfig;

pub fn validate() -> Result<(), Box<dyn std::error::Error>> {
    println!("Validating configuration...");

    match AppConfig::load() {
        Ok(config) => {
            println!("   Config parsed successfully");

            let warnings = warnings(&config);
            if warnings.is_empty() {
                println!("   All checks passed");
            } else {
                println!();
                for w in &warnings {
                    println!("   warning: {w}");
                }
            }

            println!();
            println!("   Provider:    {}", config.default_provider);
            println!(
                "   ReAct:       {} (max {} rounds)",
                config.react_model(),
                config.react.max_rounds
            );
            println!(
                "   Reflection:  {} ({} steps, window {}, sentinel {})",
                config.reflection_model(),
                config.reflection.n_steps,
                config.reflection.history_capacity,
                config.reflection.stop_sentinel
            );
        }
        Err(e) => {
            println!("   Config error: {e}");
            return Err(e.into());
        }
    }

    Ok(())
}

/// Non-fatal issues worth pointing out.
fn warnings(config: &AppConfig) -> Vec<&'static str> {
    let mut warnings = Vec::new();

    if config.api_key.is_none() {
        warnings.push("No API key set (set AGENTIC_API_KEY or GROQ_API_KEY env var)");
    }

    if config.react.max_rounds == 0 {
        warnings.push("react.max_rounds = 0: every run goes straight to the fallback completion");
    }

    if config.reflection.history_capacity == 2 {
        warnings.push("reflection.history_capacity = 2: the generator never sees its previous draft");
    }

    warnings
}

pub fn show() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    println!("{}", render_redacted(config)?);
    Ok(())
}

fn render_redacted(mut config: AppConfig) -> Result<String, toml::ser::Error> {
    const REDACTED: &str = "[REDACTED]";
    if config.api_key.is_some() {
        config.api_key = Some(REDACTED.into());
    }
    for provider in config.providers.values_mut() {
        if provider.api_key.is_some() {
            provider.api_key = Some(REDACTED.into());
        }
    }
    toml::to_string_pretty(&config)
}

pub fn path() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = AppConfig::config_dir().join("config.toml");
    println!("{}", config_path.display());
    Ok(())
}
