// Bot configuration - loaded once at startup and passed by reference.
//
// Every value is required. A missing or malformed variable is reported
// before we ever open a gateway connection.

use thiserror::Error;

pub const DISCORD_TOKEN: &str = "DISCORD_TOKEN";
pub const OPENWEB_API_URL: &str = "OPENWEB_API_URL";
pub const OPENWEB_API_KEY: &str = "OPENWEB_API_KEY";
pub const MODEL_NAME: &str = "MODEL_NAME";
pub const MONITORED_CHANNEL_ID: &str = "MONITORED_CHANNEL_ID";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing {0} environment variable! Add it to your environment or .env file.")]
    Missing(&'static str),

    #[error("MONITORED_CHANNEL_ID must be a non-zero integer channel id, got {0:?}")]
    InvalidChannelId(String),
}

/// Immutable runtime configuration for the relay.
#[derive(Clone)]
pub struct BotConfig {
    pub discord_token: String,
    pub api_url: String,
    pub api_key: String,
    pub model_name: String,
    pub monitored_channel_id: u64,
}

impl BotConfig {
    /// Reads the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    ///
    /// Blank values are treated the same as absent ones.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let require = |key: &'static str| -> Result<String, ConfigError> {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or(ConfigError::Missing(key))
        };

        let discord_token = require(DISCORD_TOKEN)?;
        let api_url = require(OPENWEB_API_URL)?;
        let model_name = require(MODEL_NAME)?;
        let raw_channel_id = require(MONITORED_CHANNEL_ID)?;
        let api_key = require(OPENWEB_API_KEY)?;

        let monitored_channel_id = match raw_channel_id.parse::<u64>() {
            Ok(id) if id != 0 => id,
            _ => return Err(ConfigError::InvalidChannelId(raw_channel_id)),
        };

        Ok(Self {
            discord_token,
            api_url,
            api_key,
            model_name,
            monitored_channel_id,
        })
    }
}

// Secrets stay out of logs.
impl std::fmt::Debug for BotConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BotConfig")
            .field("discord_token", &"<redacted>")
            .field("api_url", &self.api_url)
            .field("api_key", &"<redacted>")
            .field("model_name", &self.model_name)
            .field("monitored_channel_id", &self.monitored_channel_id)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn full_env() -> HashMap<&'static str, String> {
        HashMap::from([
            (DISCORD_TOKEN, "discord-token".to_string()),
            (OPENWEB_API_URL, "http://localhost:3000/api/chat/completions".to_string()),
            (OPENWEB_API_KEY, "sk-test".to_string()),
            (MODEL_NAME, "llama3".to_string()),
            (MONITORED_CHANNEL_ID, "1234567890".to_string()),
        ])
    }

    fn load(env: &HashMap<&'static str, String>) -> Result<BotConfig, ConfigError> {
        BotConfig::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn test_loads_all_values() {
        let config = load(&full_env()).unwrap();

        assert_eq!(config.discord_token, "discord-token");
        assert_eq!(config.api_url, "http://localhost:3000/api/chat/completions");
        assert_eq!(config.api_key, "sk-test");
        assert_eq!(config.model_name, "llama3");
        assert_eq!(config.monitored_channel_id, 1234567890);
    }

    #[test]
    fn test_each_variable_is_required() {
        for key in [
            DISCORD_TOKEN,
            OPENWEB_API_URL,
            OPENWEB_API_KEY,
            MODEL_NAME,
            MONITORED_CHANNEL_ID,
        ] {
            let mut env = full_env();
            env.remove(key);
            assert_eq!(load(&env).unwrap_err(), ConfigError::Missing(key));
        }
    }

    #[test]
    fn test_blank_value_counts_as_missing() {
        let mut env = full_env();
        env.insert(MODEL_NAME, "   ".to_string());
        assert_eq!(load(&env).unwrap_err(), ConfigError::Missing(MODEL_NAME));
    }

    #[test]
    fn test_channel_id_must_be_numeric() {
        let mut env = full_env();
        env.insert(MONITORED_CHANNEL_ID, "general".to_string());
        assert_eq!(
            load(&env).unwrap_err(),
            ConfigError::InvalidChannelId("general".to_string())
        );
    }

    #[test]
    fn test_channel_id_zero_rejected() {
        let mut env = full_env();
        env.insert(MONITORED_CHANNEL_ID, "0".to_string());
        assert!(matches!(
            load(&env),
            Err(ConfigError::InvalidChannelId(_))
        ));
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let config = load(&full_env()).unwrap();
        let debug = format!("{:?}", config);
        assert!(!debug.contains("discord-token"));
        assert!(!debug.contains("sk-test"));
        assert!(debug.contains("llama3"));
    }
}
