//! Configuration loading and validation for the agentic loops.
//!
//! Loads configuration from `~/.agentic/config.toml` with environment
//! variable overrides. Validates all settings at startup.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// The root configuration structure.
///
/// Maps directly to `~/.agentic/config.toml`.
#[derive(Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// API key (can be overridden per-provider)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Default LLM provider
    #[serde(default = "default_provider")]
    pub default_provider: String,

    /// Default model
    #[serde(default = "default_model")]
    pub default_model: String,

    /// Sampling temperature; provider default when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_temperature: Option<f32>,

    /// Max tokens per completion; provider default when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_max_tokens: Option<u32>,

    /// ReAct agent settings
    #[serde(default)]
    pub react: ReactConfig,

    /// Reflection agent settings
    #[serde(default)]
    pub reflection: ReflectionConfig,

    /// Provider-specific configurations
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,
}

fn default_provider() -> String {
    "groq".into()
}
fn default_model() -> String {
    "llama-3.3-70b-versatile".into()
}

/// Redact a secret for Debug output.
fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("api_key", &redact(&self.api_key))
            .field("default_provider", &self.default_provider)
            .field("default_model", &self.default_model)
            .field("default_temperature", &self.default_temperature)
            .field("default_max_tokens", &self.default_max_tokens)
            .field("react", &self.react)
            .field("reflection", &self.reflection)
            .field("providers", &self.providers)
            .finish()
    }
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("api_key", &redact(&self.api_key))
            .field("api_url", &self.api_url)
            .field("default_model", &self.default_model)
            .finish()
    }
}

#[derive(Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_model: Option<String>,
}

/// Settings for the tool-using ReAct agent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReactConfig {
    /// Model override; falls back to `default_model`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    /// Prefix placed before the ReAct instructions
    #[serde(default)]
    pub system_prompt: String,

    #[serde(default = "default_max_rounds")]
    pub max_rounds: usize,
}

fn default_max_rounds() -> usize {
    10
}

impl Default for ReactConfig {
    fn default() -> Self {
        Self {
            model: None,
            system_prompt: String::new(),
            max_rounds: default_max_rounds(),
        }
    }
}

/// Settings for the generate/reflect agent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReflectionConfig {
    /// Model override; falls back to `default_model`
    #[serde(
        default = "default_reflection_model",
        skip_serializing_if = "Option::is_none"
    )]
    pub model: Option<String>,

    /// Prefix placed before the generator's base instructions
    #[serde(default)]
    pub generation_system_prompt: String,

    /// Prefix placed before the critic's base instructions
    #[serde(default)]
    pub reflection_system_prompt: String,

    #[serde(default = "default_n_steps")]
    pub n_steps: usize,

    /// Window size of each rolling history, system prompt included
    #[serde(default = "default_history_capacity")]
    pub history_capacity: usize,

    /// Literal the critic emits to accept a generation
    #[serde(default = "default_stop_sentinel")]
    pub stop_sentinel: String,
}

fn default_reflection_model() -> Option<String> {
    Some("llama-3.1-8b-instant".into())
}
fn default_n_steps() -> usize {
    10
}
fn default_history_capacity() -> usize {
    3
}
fn default_stop_sentinel() -> String {
    "<OK>".into()
}

impl Default for ReflectionConfig {
    fn default() -> Self {
        Self {
            model: default_reflection_model(),
            generation_system_prompt: String::new(),
            reflection_system_prompt: String::new(),
            n_steps: default_n_steps(),
            history_capacity: default_history_capacity(),
            stop_sentinel: default_stop_sentinel(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the default path (~/.agentic/config.toml).
    ///
    /// Also checks environment variables for API keys:
    /// - `AGENTIC_API_KEY` (highest priority)
    /// - `GROQ_API_KEY`
    /// - `OPENAI_API_KEY`
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_dir().join("config.toml");
        let mut config = Self::load_from(&config_path)?;
        config.apply_env(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Apply environment overrides through `lookup`.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if self.api_key.is_none() {
            self.api_key = lookup("AGENTIC_API_KEY")
                .or_else(|| lookup("GROQ_API_KEY"))
                .or_else(|| lookup("OPENAI_API_KEY"));
        }

        if let Some(provider) = lookup("AGENTIC_PROVIDER") {
            self.default_provider = provider;
        }

        if let Some(model) = lookup("AGENTIC_MODEL") {
            self.default_model = model;
        }
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".agentic")
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(t) = self.default_temperature
            && !(0.0..=2.0).contains(&t)
        {
            return Err(ConfigError::ValidationError(
                "default_temperature must be between 0.0 and 2.0".into(),
            ));
        }

        if self.reflection.n_steps == 0 {
            return Err(ConfigError::ValidationError(
                "reflection.n_steps must be at least 1".into(),
            ));
        }

        if self.reflection.history_capacity < 2 {
            return Err(ConfigError::ValidationError(
                "reflection.history_capacity must be at least 2".into(),
            ));
        }

        if self.reflection.stop_sentinel.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "reflection.stop_sentinel must not be empty".into(),
            ));
        }

        Ok(())
    }

    /// Check if an API key is available (from config or environment).
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Model used when an agent section names none: the default provider's
    /// own `default_model`, then the global `default_model`.
    pub fn provider_model(&self) -> &str {
        self.providers
            .get(&self.default_provider)
            .and_then(|p| p.default_model.as_deref())
            .unwrap_or(&self.default_model)
    }

    /// Model used by the ReAct agent.
    pub fn react_model(&self) -> &str {
        self.react
            .model
            .as_deref()
            .unwrap_or_else(|| self.provider_model())
    }

    /// Model used by the reflection agent.
    pub fn reflection_model(&self) -> &str {
        self.reflection
            .model
            .as_deref()
            .unwrap_or_else(|| self.provider_model())
    }

    /// Generate a default config TOML string.
    pub fn default_toml() -> String {
        toml::to_string_pretty(&Self::default()).unwrap_or_default()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            default_provider: default_provider(),
            default_model: default_model(),
            default_temperature: None,
            default_max_tokens: None,
            react: ReactConfig::default(),
            reflection: ReflectionConfig::default(),
            providers: HashMap::new(),
        }
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = AppConfig::default();
        assert_eq!(config.default_provider, "groq");
        assert_eq!(config.react.max_rounds, 10);
        assert_eq!(config.reflection.n_steps, 10);
        assert_eq!(config.reflection.history_capacity, 3);
        assert_eq!(config.reflection.stop_sentinel, "<OK>");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn config_roundtrip_toml() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: AppConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.default_provider, config.default_provider);
        assert_eq!(parsed.reflection_model(), "llama-3.1-8b-instant");
    }

    #[test]
    fn invalid_temperature_rejected() {
        let config = AppConfig {
            default_temperature: Some(5.0),
            ..AppConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_steps_rejected() {
        let mut config = AppConfig::default();
        config.reflection.n_steps = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn tiny_history_rejected() {
        let mut config = AppConfig::default();
        config.reflection.history_capacity = 1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn missing_config_file_returns_defaults() {
        let config = AppConfig::load_from(Path::new("/nonexistent/config.toml")).unwrap();
        assert_eq!(config.default_provider, "groq");
    }

    #[test]
    fn load_from_file_with_sections() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
default_model = "llama-3.1-70b"

[react]
max_rounds = 4
system_prompt = "You are terse."

[reflection]
n_steps = 2
stop_sentinel = "<DONE>"

[providers.groq]
api_key = "gsk-test"
"#,
        )
        .unwrap();

        let config = AppConfig::load_from(&path).unwrap();
        assert_eq!(config.react.max_rounds, 4);
        assert_eq!(config.react_model(), "llama-3.1-70b");
        assert_eq!(config.react.system_prompt, "You are terse.");
        assert_eq!(config.reflection.n_steps, 2);
        assert_eq!(config.reflection.history_capacity, 3);
        assert_eq!(config.reflection.stop_sentinel, "<DONE>");
        assert_eq!(
            config.providers["groq"].api_key.as_deref(),
            Some("gsk-test")
        );
    }

    #[test]
    fn provider_default_model_used_when_agent_names_none() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
default_provider = "openai"

[providers.openai]
default_model = "gpt-4o"

[providers.groq]
default_model = "mixtral-8x7b"
"#,
        )
        .unwrap();

        let mut config = AppConfig::load_from(&path).unwrap();
        assert_eq!(config.provider_model(), "gpt-4o");
        assert_eq!(config.react_model(), "gpt-4o");

        config.react.model = Some("gpt-4o-mini".into());
        assert_eq!(config.react_model(), "gpt-4o-mini");

        config.reflection.model = None;
        assert_eq!(config.reflection_model(), "gpt-4o");

        config.providers.remove("openai");
        assert_eq!(config.provider_model(), "llama-3.3-70b-versatile");
    }

    #[test]
    fn malformed_file_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "react = [").unwrap();
        assert!(matches!(
            AppConfig::load_from(&path),
            Err(ConfigError::ParseError { .. })
        ));
    }

    #[test]
    fn env_overrides() {
        let mut config = AppConfig::default();
        config.apply_env(|key| match key {
            "GROQ_API_KEY" => Some("gsk-env".into()),
            "OPENAI_API_KEY" => Some("sk-env".into()),
            "AGENTIC_MODEL" => Some("mixtral".into()),
            _ => None,
        });
        assert_eq!(config.api_key.as_deref(), Some("gsk-env"));
        assert_eq!(config.default_model, "mixtral");
        assert_eq!(config.default_provider, "groq");
    }

    #[test]
    fn file_key_beats_env() {
        let mut config = AppConfig {
            api_key: Some("from-file".into()),
            ..AppConfig::default()
        };
        config.apply_env(|_| Some("from-env".into()));
        assert_eq!(config.api_key.as_deref(), Some("from-file"));
    }

    #[test]
    fn debug_redacts_secrets() {
        let config = AppConfig {
            api_key: Some("gsk-secret".into()),
            ..AppConfig::default()
        };
        let debug = format!("{config:?}");
        assert!(!debug.contains("gsk-secret"));
        assert!(debug.contains("[REDACTED]"));
    }
}
