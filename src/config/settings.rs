//! Application settings loaded from config.toml and the environment.
//!
//! config.toml is optional: every field has a default, so the bot runs with only
//! `DISCORD_BOT_TOKEN` set. Credentials never live in the file; they are read from the
//! environment (usually via `.env`).

use crate::core::category;
use crate::errors::{Error, Result};
use chrono_tz::Tz;
use serde::Deserialize;
use std::path::Path;
use tracing::{info, warn};

/// Default location of the settings file
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Top-level application configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Timezone used for "today", "this week" and "this month"
    pub timezone: Tz,
    /// Currency label appended to amounts in reports
    pub currency: String,
    /// Ordered list of expense categories offered to the classifier
    pub categories: Vec<String>,
    /// Remote classifier settings
    pub classifier: ClassifierConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            timezone: Tz::UTC,
            currency: "руб.".to_string(),
            categories: category::default_categories(),
            classifier: ClassifierConfig::default(),
        }
    }
}

/// Settings for the chat-completion endpoint used for classification
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Full URL of the chat-completions endpoint
    pub endpoint: String,
    /// Model name sent with every request
    pub model: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.deepseek.com/chat/completions".to_string(),
            model: "deepseek-chat".to_string(),
            timeout_secs: 30,
        }
    }
}

impl AppConfig {
    /// Checks invariants serde cannot express.
    pub fn validate(&self) -> Result<()> {
        if self.categories.is_empty() {
            return Err(Error::Config {
                message: "categories must not be empty".to_string(),
            });
        }
        if !self
            .categories
            .iter()
            .any(|c| c == category::FALLBACK_CATEGORY)
        {
            return Err(Error::Config {
                message: format!(
                    "categories must include the fallback category '{}'",
                    category::FALLBACK_CATEGORY
                ),
            });
        }
        if self.classifier.timeout_secs == 0 {
            return Err(Error::Config {
                message: "classifier.timeout_secs must be greater than zero".to_string(),
            });
        }
        Ok(())
    }
}

/// Parses and validates settings from a TOML string.
pub fn parse_config(contents: &str) -> Result<AppConfig> {
    let config: AppConfig = toml::from_str(contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })?;
    config.validate()?;
    Ok(config)
}

/// Loads settings from a TOML file.
///
/// # Errors
/// Returns an error if the file cannot be read, the TOML is invalid, or validation fails.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let path_ref = path.as_ref();
    tracing::debug!("Attempting to load configuration from: {:?}", path_ref);
    let contents = std::fs::read_to_string(path_ref).map_err(|e| Error::Config {
        message: format!("Failed to read config file {}: {e}", path_ref.display()),
    })?;
    parse_config(&contents)
}

/// Loads settings from `CONFIG_PATH` (default `config.toml`), falling back to defaults
/// when the file does not exist.
pub fn load_app_configuration() -> Result<AppConfig> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    if Path::new(&path).exists() {
        let config = load_config(&path)?;
        info!("Loaded configuration from {}", path);
        Ok(config)
    } else {
        info!("No configuration file at {}, using defaults", path);
        Ok(AppConfig::default())
    }
}

/// Secrets read from the environment.
#[derive(Clone)]
pub struct Credentials {
    /// Discord bot token; required
    pub bot_token: String,
    /// Classification-service API key; absent means every expense gets the fallback
    pub classifier_api_key: Option<String>,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("bot_token", &"<redacted>")
            .field(
                "classifier_api_key",
                &self.classifier_api_key.as_ref().map(|_| "<redacted>"),
            )
            .finish()
    }
}

impl Credentials {
    /// Reads `DISCORD_BOT_TOKEN` and `CLASSIFIER_API_KEY` (or `DEEPSEEK_API_KEY`).
    ///
    /// # Errors
    /// A missing bot token is fatal. A missing classifier key only logs a warning.
    pub fn from_env() -> Result<Self> {
        let bot_token = non_empty_var("DISCORD_BOT_TOKEN").ok_or_else(|| Error::Config {
            message: "DISCORD_BOT_TOKEN is not set".to_string(),
        })?;

        let classifier_api_key =
            non_empty_var("CLASSIFIER_API_KEY").or_else(|| non_empty_var("DEEPSEEK_API_KEY"));
        if classifier_api_key.is_none() {
            warn!(
                "CLASSIFIER_API_KEY is not set; expenses will be filed under '{}'",
                category::FALLBACK_CATEGORY
            );
        }

        Ok(Self {
            bot_token,
            classifier_api_key,
        })
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = parse_config("").unwrap();
        assert_eq!(config.timezone, Tz::UTC);
        assert_eq!(config.currency, "руб.");
        assert_eq!(config.categories, category::default_categories());
        assert_eq!(config.classifier.model, "deepseek-chat");
        assert_eq!(config.classifier.timeout_secs, 30);
    }

    #[test]
    fn test_parse_full_config() {
        let toml_str = r#"
            timezone = "Europe/Moscow"
            currency = "₽"
            categories = ["Продукты", "Транспорт", "Прочее"]

            [classifier]
            endpoint = "http://localhost:8080/v1/chat/completions"
            model = "local-model"
            timeout_secs = 5
        "#;

        let config = parse_config(toml_str).unwrap();
        assert_eq!(config.timezone, chrono_tz::Europe::Moscow);
        assert_eq!(config.currency, "₽");
        assert_eq!(config.categories.len(), 3);
        assert_eq!(
            config.classifier.endpoint,
            "http://localhost:8080/v1/chat/completions"
        );
        assert_eq!(config.classifier.model, "local-model");
        assert_eq!(config.classifier.timeout_secs, 5);
    }

    #[test]
    fn test_unknown_timezone_is_rejected() {
        let result = parse_config(r#"timezone = "Mars/Olympus""#);
        assert!(matches!(result, Err(Error::Config { .. })));
    }

    #[test]
    fn test_categories_must_contain_fallback() {
        let result = parse_config(r#"categories = ["Продукты"]"#);
        assert!(matches!(result, Err(Error::Config { .. })));

        let result = parse_config("categories = []");
        assert!(matches!(result, Err(Error::Config { .. })));
    }

    #[test]
    fn test_zero_timeout_is_rejected() {
        let result = parse_config("[classifier]\ntimeout_secs = 0");
        assert!(matches!(result, Err(Error::Config { .. })));
    }

    #[test]
    fn test_load_config_missing_file() {
        let result = load_config("definitely/not/here/config.toml");
        assert!(matches!(result, Err(Error::Config { .. })));
    }

    #[test]
    fn test_credentials_debug_redacts_secrets() {
        let credentials = Credentials {
            bot_token: "secret-token".to_string(),
            classifier_api_key: Some("secret-key".to_string()),
        };
        let rendered = format!("{credentials:?}");
        assert!(!rendered.contains("secret-token"));
        assert!(!rendered.contains("secret-key"));
    }
}
