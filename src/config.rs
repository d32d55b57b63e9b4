//! Runtime configuration, read from the process environment (and `.env` via `dotenv`).

use std::env;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// Errors raised while reading the bot configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {key}: {value}")]
    Invalid { key: &'static str, value: String },
}

/// Settings shared by the command layer and the playback core
#[derive(Debug, Clone)]
pub struct BotConfig {
    pub discord_token: String,
    pub command_prefix: String,
    /// Maximum number of resolver calls running at once
    pub resolver_workers: usize,
    /// How often a playback session checks whether the current track has ended
    pub poll_interval: Duration,
    pub ytdlp_path: String,
    pub default_volume: f32,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            discord_token: String::new(),
            command_prefix: "!".to_string(),
            resolver_workers: 10,
            poll_interval: Duration::from_secs(1),
            ytdlp_path: "yt-dlp".to_string(),
            default_volume: 0.5,
        }
    }
}

impl BotConfig {
    /// Build the configuration from environment variables, falling back to defaults
    /// for everything except the Discord token.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let discord_token = lookup("DISCORD_TOKEN")
            .filter(|token| !token.trim().is_empty())
            .ok_or(ConfigError::Missing("DISCORD_TOKEN"))?;

        let resolver_workers: usize =
            parse_or(&lookup, "RESOLVER_WORKERS", defaults.resolver_workers)?;
        if resolver_workers == 0 {
            return Err(ConfigError::Invalid {
                key: "RESOLVER_WORKERS",
                value: "0".to_string(),
            });
        }

        let poll_ms: u64 = parse_or(
            &lookup,
            "PLAYBACK_POLL_MS",
            defaults.poll_interval.as_millis() as u64,
        )?;

        let default_volume: f32 = parse_or(&lookup, "DEFAULT_VOLUME", defaults.default_volume)?;
        if !(0.0..=2.0).contains(&default_volume) {
            return Err(ConfigError::Invalid {
                key: "DEFAULT_VOLUME",
                value: default_volume.to_string(),
            });
        }

        let config = Self {
            discord_token,
            command_prefix: lookup("COMMAND_PREFIX").unwrap_or(defaults.command_prefix),
            resolver_workers,
            poll_interval: Duration::from_millis(poll_ms.max(1)),
            ytdlp_path: lookup("YTDLP_PATH").unwrap_or(defaults.ytdlp_path),
            default_volume,
        };

        debug!(
            "Loaded configuration: prefix={}, workers={}, poll={:?}, yt-dlp={}",
            config.command_prefix, config.resolver_workers, config.poll_interval, config.ytdlp_path
        );

        Ok(config)
    }
}

fn parse_or<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(key) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
        None => Ok(default),
    }
}
