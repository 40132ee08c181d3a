//! Configuration management

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::application::errors::ConfigError;

/// Bot configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    pub bot: BotConfig,
    pub storage: StorageConfig,
    pub adapters: AdaptersConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct BotConfig {
    pub name: String,
    pub prefix: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct StorageConfig {
    /// Path of the SQLite database file
    pub database: PathBuf,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct AdaptersConfig {
    pub telegram: Option<TelegramConfig>,
    pub console: Option<ConsoleConfig>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct TelegramConfig {
    pub enabled: bool,
    pub token: Option<String>,
    /// Long-polling timeout in seconds
    pub poll_timeout: Option<i64>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct ConsoleConfig {
    pub enabled: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bot: BotConfig {
                name: "repbot".to_string(),
                prefix: "/".to_string(),
            },
            storage: StorageConfig {
                database: PathBuf::from("repbot.db"),
            },
            adapters: AdaptersConfig {
                telegram: Some(TelegramConfig {
                    enabled: false,
                    token: None,
                    poll_timeout: Some(30),
                }),
                console: Some(ConsoleConfig { enabled: true }),
            },
        }
    }
}

impl Config {
    /// Load configuration from a YAML file
    pub fn load(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Parse(format!("cannot read {}: {}", path, e)))?;
        serde_yaml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Build a config from environment variables only
    pub fn load_env() -> Self {
        let mut config = Self::default();
        if let Ok(token) = std::env::var("TELEGRAM_BOT_TOKEN") {
            config.adapters.telegram = Some(TelegramConfig {
                enabled: true,
                token: Some(token),
                poll_timeout: Some(30),
            });
        }
        if let Ok(path) = std::env::var("REPBOT_DB") {
            config.storage.database = PathBuf::from(path);
        }
        config
    }

    /// Telegram token, if the telegram adapter is usable
    pub fn telegram_token(&self) -> Option<String> {
        self.adapters
            .telegram
            .as_ref()
            .filter(|t| t.enabled)
            .and_then(|t| t.token.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_round_trips_through_yaml() {
        let config = Config::default();
        let yaml = serde_yaml::to_string(&config).unwrap();
        let parsed: Config = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed.bot.name, "repbot");
        assert_eq!(parsed.bot.prefix, "/");
        assert_eq!(parsed.storage.database, PathBuf::from("repbot.db"));
    }

    #[test]
    fn kebab_case_keys_are_accepted() {
        let yaml = "\
bot:
  name: repbot
  prefix: \"/\"
storage:
  database: data/bot.db
adapters:
  telegram:
    enabled: true
    token: \"123:abc\"
    poll-timeout: 10
  console: null
";
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.telegram_token(), Some("123:abc".to_string()));
        assert_eq!(
            config.adapters.telegram.unwrap().poll_timeout,
            Some(10)
        );
    }
}
