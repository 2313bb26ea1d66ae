use std::str::FromStr;

use crate::error::{config::ConfigError, AppError};
use crate::model::ai::AiProvider;

const DEFAULT_LAVALINK_HOST: &str = "127.0.0.1:2333";
const DEFAULT_COMMAND_PREFIX: &str = ".";
const DEFAULT_BATCH_SIZE: usize = 100;
const DEFAULT_FLUSH_SECONDS: u64 = 30;

/// Credentials for the AI chat relay. Present only when a provider and key are set.
#[derive(Debug, Clone)]
pub struct AiConfig {
    pub provider: AiProvider,
    pub api_key: String,
    pub model: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub discord_bot_token: String,
    pub database_url: String,
    pub command_prefix: String,

    pub lavalink_host: String,
    pub lavalink_password: String,
    pub lavalink_ssl: bool,
    pub lastfm_api_key: Option<String>,

    pub ai: Option<AiConfig>,

    pub message_count_batch_size: usize,
    pub message_count_flush_seconds: u64,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        let ai = match (optional("AI_PROVIDER"), optional("AI_API_KEY")) {
            (Some(provider), Some(api_key)) => {
                let provider: AiProvider = parse("AI_PROVIDER", provider)?;
                Some(AiConfig {
                    model: optional("AI_MODEL")
                        .unwrap_or_else(|| provider.default_model().to_string()),
                    provider,
                    api_key,
                })
            }
            _ => None,
        };

        Ok(Self {
            discord_bot_token: required("DISCORD_BOT_TOKEN")?,
            database_url: required("DATABASE_URL")?,
            command_prefix: optional("COMMAND_PREFIX")
                .unwrap_or_else(|| DEFAULT_COMMAND_PREFIX.to_string()),
            lavalink_host: optional("LAVALINK_HOST")
                .unwrap_or_else(|| DEFAULT_LAVALINK_HOST.to_string()),
            lavalink_password: optional("LAVALINK_PASSWORD").unwrap_or_default(),
            lavalink_ssl: optional("LAVALINK_SSL")
                .map(|v| parse("LAVALINK_SSL", v))
                .transpose()?
                .unwrap_or(false),
            lastfm_api_key: optional("LASTFM_API_KEY"),
            ai,
            message_count_batch_size: optional("MESSAGE_COUNT_BATCH_SIZE")
                .map(|v| parse("MESSAGE_COUNT_BATCH_SIZE", v))
                .transpose()?
                .unwrap_or(DEFAULT_BATCH_SIZE),
            message_count_flush_seconds: optional("MESSAGE_COUNT_FLUSH_SECONDS")
                .map(|v| parse("MESSAGE_COUNT_FLUSH_SECONDS", v))
                .transpose()?
                .unwrap_or(DEFAULT_FLUSH_SECONDS),
        })
    }
}

fn required(name: &str) -> Result<String, ConfigError> {
    std::env::var(name).map_err(|_| ConfigError::MissingEnvVar(name.to_string()))
}

fn optional(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn parse<T: FromStr>(name: &str, value: String) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        name: name.to_string(),
        value,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_reports_variable_name() {
        let result: Result<u64, _> = parse("MESSAGE_COUNT_FLUSH_SECONDS", "soon".to_string());

        match result {
            Err(ConfigError::InvalidValue { name, value }) => {
                assert_eq!(name, "MESSAGE_COUNT_FLUSH_SECONDS");
                assert_eq!(value, "soon");
            }
            other => panic!("unexpected result: {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn parse_trims_whitespace() {
        let result: usize = parse("MESSAGE_COUNT_BATCH_SIZE", " 250 ".to_string()).unwrap();
        assert_eq!(result, 250);
    }
}
