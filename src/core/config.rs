//! Configuration management for Colloquy
//!
//! Defaults are pure values. `Config::load` layers a config file and then the
//! environment on top of them; the resulting value is handed explicitly to the
//! team and the session, nothing reads configuration behind their back.
//!
//! Config file location: ~/.config/colloquy/config.toml

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::PathBuf;

use crate::agent::termination::MatchMode;
use crate::core::error::{ColloquyError, Result};

/// Main configuration for Colloquy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Generation backend configuration
    pub llm: LlmConfig,
    /// Session configuration
    #[serde(default)]
    pub session: SessionConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Generation backend settings shared by every model-backed agent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Model identifier (default: gpt-4)
    pub model: String,
    /// Bearer credential for the backend
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Base URL of an OpenAI-compatible API
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Sampling temperature
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

/// Group chat settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Round ceiling for one session
    /// Default: 12
    pub max_rounds: usize,
    /// Name of the controller participant
    pub admin_name: String,
    /// Content type requested when none is given
    pub content_type: String,
    /// How completion signals must appear in a message
    #[serde(default)]
    pub termination_match: MatchMode,
}

/// Logging settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter when RUST_LOG is unset
    pub level: String,
    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            llm: LlmConfig::default(),
            session: SessionConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4".to_string(),
            api_key: None,
            base_url: "https://api.openai.com/v1".to_string(),
            timeout_secs: 300,
            temperature: None,
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_rounds: 12,
            admin_name: "Admin".to_string(),
            content_type: "technical_blog".to_string(),
            termination_match: MatchMode::default(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            json: false,
        }
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("colloquy")
    }

    /// Get the config file path
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    /// Load configuration from .env, config file, environment and defaults
    /// Priority: CLI args > env vars > config file > defaults
    ///
    /// Values that were ignored are logged with the current subscriber; use
    /// [`Config::load_with_warnings`] to report them after logging is set up.
    pub fn load() -> Self {
        let (config, warnings) = Self::load_with_warnings();
        for warning in &warnings {
            tracing::warn!("{warning}");
        }
        config
    }

    /// Load configuration and return the problems that were skipped over
    pub fn load_with_warnings() -> (Self, Vec<String>) {
        let _ = dotenvy::dotenv();
        let mut warnings = Vec::new();

        let mut config = if Self::config_exists() {
            Self::load_from_file().unwrap_or_else(|e| {
                warnings.push(format!("{e}; using defaults"));
                Self::default()
            })
        } else {
            Self::default()
        };

        warnings.extend(config.apply_env_overrides(|key| env::var(key).ok()));
        (config, warnings)
    }

    /// Load configuration from file only
    pub fn load_from_file() -> Result<Self> {
        let config_path = Self::config_file();

        if !config_path.exists() {
            return Err(ColloquyError::config("Config file not found"));
        }

        let content = fs::read_to_string(&config_path)
            .map_err(|e| ColloquyError::config(format!("Failed to read config: {}", e)))?;

        Self::from_toml(&content)
    }

    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| ColloquyError::config(format!("Failed to parse config: {}", e)))
    }

    /// Overlay values from an environment lookup
    ///
    /// The lookup is injected so callers and tests decide where values come from.
    /// Returns a note for every value that could not be used.
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Vec<String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut ignored = Vec::new();

        if let Some(model) = lookup("MODEL_NAME").filter(|m| !m.trim().is_empty()) {
            self.llm.model = model;
        }

        if let Some(key) = lookup("OPENAI_API_KEY").filter(|k| !k.trim().is_empty()) {
            self.llm.api_key = Some(key);
        }

        if let Some(url) = lookup("OPENAI_BASE_URL").filter(|u| !u.trim().is_empty()) {
            self.llm.base_url = url;
        }

        if let Some(raw) = lookup("TIMEOUT_SECONDS") {
            match raw.trim().parse() {
                Ok(secs) => self.llm.timeout_secs = secs,
                Err(_) => ignored.push(format!("ignoring unparseable TIMEOUT_SECONDS={raw:?}")),
            }
        }

        if let Some(raw) = lookup("MAX_ROUNDS") {
            match raw.trim().parse() {
                Ok(rounds) => self.session.max_rounds = rounds,
                Err(_) => ignored.push(format!("ignoring unparseable MAX_ROUNDS={raw:?}")),
            }
        }

        if let Some(level) = lookup("COLLOQUY_LOG").filter(|l| !l.trim().is_empty()) {
            self.logging.level = level;
        }

        ignored
    }

    /// Check values that would make every session fail
    pub fn validate(&self) -> Result<()> {
        if self.llm.model.trim().is_empty() {
            return Err(ColloquyError::config("Model name must not be empty"));
        }
        if self.llm.timeout_secs == 0 {
            return Err(ColloquyError::config("Timeout must be at least one second"));
        }
        if self.session.admin_name.trim().is_empty() {
            return Err(ColloquyError::config("Admin name must not be empty"));
        }
        Ok(())
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<PathBuf> {
        let config_dir = Self::config_dir();
        let config_path = Self::config_file();

        if !config_dir.exists() {
            fs::create_dir_all(&config_dir)
                .map_err(|e| ColloquyError::config(format!("Failed to create config dir: {}", e)))?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| ColloquyError::config(format!("Failed to serialize config: {}", e)))?;

        fs::write(&config_path, content)
            .map_err(|e| ColloquyError::config(format!("Failed to write config: {}", e)))?;

        Ok(config_path)
    }

    /// Check if a config file exists
    pub fn config_exists() -> bool {
        Self::config_file().exists()
    }

    /// Render a configuration as TOML for display
    pub fn to_toml(&self) -> String {
        toml::to_string_pretty(self).unwrap_or_else(|_| String::from("# Error generating config"))
    }

    /// Copy safe to print: the API key is masked
    pub fn redacted(&self) -> Self {
        let mut config = self.clone();
        if config.llm.api_key.is_some() {
            config.llm.api_key = Some("***".to_string());
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.llm.model, "gpt-4");
        assert_eq!(config.llm.timeout_secs, 300);
        assert_eq!(config.session.max_rounds, 12);
        assert_eq!(config.session.admin_name, "Admin");
        assert!(config.llm.api_key.is_none());
    }

    #[test]
    fn test_env_overrides() {
        let mut config = Config::default();
        config.apply_env_overrides(lookup_from(&[
            ("MODEL_NAME", "gpt-4o-mini"),
            ("OPENAI_API_KEY", "sk-test"),
            ("TIMEOUT_SECONDS", "30"),
            ("MAX_ROUNDS", "3"),
        ]));

        assert_eq!(config.llm.model, "gpt-4o-mini");
        assert_eq!(config.llm.api_key.as_deref(), Some("sk-test"));
        assert_eq!(config.llm.timeout_secs, 30);
        assert_eq!(config.session.max_rounds, 3);
    }

    #[test]
    fn test_bad_numbers_are_ignored() {
        let mut config = Config::default();
        let ignored = config
            .apply_env_overrides(lookup_from(&[("MAX_ROUNDS", "lots"), ("TIMEOUT_SECONDS", "")]));
        assert_eq!(config.session.max_rounds, 12);
        assert_eq!(config.llm.timeout_secs, 300);
        assert_eq!(ignored.len(), 2);
        assert!(ignored.iter().any(|w| w.contains("MAX_ROUNDS") && w.contains("lots")));
        assert!(ignored.iter().any(|w| w.contains("TIMEOUT_SECONDS")));
    }

    #[test]
    fn test_clean_overrides_report_nothing() {
        let mut config = Config::default();
        let ignored = config.apply_env_overrides(lookup_from(&[("MAX_ROUNDS", "4")]));
        assert!(ignored.is_empty());
    }

    #[test]
    fn test_redacted_masks_api_key() {
        let mut config = Config::default();
        config.llm.api_key = Some("sk-secret-value".to_string());

        let shown = config.redacted().to_toml();
        assert!(!shown.contains("sk-secret-value"));
        assert!(shown.contains("***"));
        assert_eq!(config.llm.api_key.as_deref(), Some("sk-secret-value"));

        let without_key = Config::default().redacted();
        assert!(without_key.llm.api_key.is_none());
    }

    #[test]
    fn test_termination_match_from_file() {
        let config = Config::from_toml(
            r#"
[llm]
model = "gpt-4"
base_url = "https://api.openai.com/v1"
timeout_secs = 300

[session]
max_rounds = 8
admin_name = "Admin"
content_type = "tutorial"
termination_match = "whole_message"
"#,
        )
        .unwrap();
        assert_eq!(config.session.termination_match, MatchMode::WholeMessage);
        assert_eq!(Config::default().session.termination_match, MatchMode::Substring);
    }

    #[test]
    fn test_toml_round_trip_keeps_sections() {
        let config = Config::default();
        let toml_str = config.to_toml();
        assert!(toml_str.contains("[llm]"));
        assert!(toml_str.contains("max_rounds"));
        assert_eq!(Config::from_toml(&toml_str).unwrap(), config);
    }

    #[test]
    fn test_partial_file_uses_section_defaults() {
        let config = Config::from_toml(
            r#"
[llm]
model = "llama3"
base_url = "http://localhost:11434/v1"
timeout_secs = 60
"#,
        )
        .unwrap();
        assert_eq!(config.llm.model, "llama3");
        assert_eq!(config.session, SessionConfig::default());
    }

    #[test]
    fn test_validate() {
        let mut config = Config::default();
        assert!(config.validate().is_ok());

        config.session.max_rounds = 0;
        assert!(config.validate().is_ok());

        config.llm.timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_dir() {
        let dir = Config::config_dir();
        assert!(dir.to_string_lossy().contains("colloquy"));
    }
}
