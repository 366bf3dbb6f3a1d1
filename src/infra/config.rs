//! Loads the TOML configuration and normalizes it into `AppConfig`.
//! A missing config file is fine; everything has a default.
use std::path::Path;

use chrono_tz::Tz;
use serde::Deserialize;
use tokio::fs;
use tracing::info;

use crate::domain::model::{AppConfig, AppMode};
use crate::domain::schedule::PollPolicy;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("toml: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Deserialize, Default)]
struct RawFile {
    #[serde(default)]
    app: RawApp,
    #[serde(default)]
    state: RawState,
    #[serde(default)]
    polling: RawPolling,
    #[serde(default)]
    requests: RawRequests,
    #[serde(default)]
    logging: RawLogging,
}

#[derive(Debug, Deserialize, Default)]
struct RawApp {
    mode: Option<String>,
    timezone: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
struct RawState {
    path: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
struct RawPolling {
    inprogress_seconds: Option<u64>,
    active_seconds: Option<u64>,
    idle_seconds: Option<u64>,
    active_window_days: Option<u64>,
}

#[derive(Debug, Deserialize, Default)]
struct RawRequests {
    api_base: Option<String>,
    user_agent: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
struct RawLogging {
    level: Option<String>,
}

pub struct ConfigLoader;

impl ConfigLoader {
    pub async fn load(config_path: &Path) -> Result<AppConfig, ConfigError> {
        let raw: RawFile = match fs::read_to_string(config_path).await {
            Ok(content) => toml::from_str(&content)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!(path = %config_path.display(), "no config file, using defaults");
                RawFile::default()
            }
            Err(e) => return Err(e.into()),
        };

        let defaults = AppConfig::default();

        let mode = parse_mode(raw.app.mode.as_deref())?;
        let timezone: Tz = match raw.app.timezone.as_deref().filter(|s| !s.trim().is_empty()) {
            Some(tz_str) => tz_str
                .parse()
                .map_err(|_| ConfigError::Invalid(format!("invalid timezone '{tz_str}'")))?,
            None => defaults.timezone,
        };

        let policy = parse_policy(&raw.polling)?;

        Ok(AppConfig {
            state_path: raw
                .state
                .path
                .map(Into::into)
                .unwrap_or(defaults.state_path),
            api_base: raw
                .requests
                .api_base
                .map(|s| s.trim_end_matches('/').to_string())
                .unwrap_or(defaults.api_base),
            user_agent: raw.requests.user_agent.unwrap_or(defaults.user_agent),
            log_level: raw.logging.level.unwrap_or(defaults.log_level),
            mode,
            timezone,
            policy,
        })
    }
}

fn parse_mode(raw: Option<&str>) -> Result<AppMode, ConfigError> {
    match raw {
        None => Ok(AppMode::Prod),
        Some(s) => match s.to_ascii_lowercase().as_str() {
            "dev" => Ok(AppMode::Dev),
            "prod" => Ok(AppMode::Prod),
            other => Err(ConfigError::Invalid(format!("unknown mode '{other}'"))),
        },
    }
}

fn parse_policy(raw: &RawPolling) -> Result<PollPolicy, ConfigError> {
    let defaults = PollPolicy::default();
    let policy = PollPolicy {
        inprogress_ms: seconds_to_ms(raw.inprogress_seconds, defaults.inprogress_ms)?,
        active_ms: seconds_to_ms(raw.active_seconds, defaults.active_ms)?,
        idle_ms: seconds_to_ms(raw.idle_seconds, defaults.idle_ms)?,
        active_window_ms: match raw.active_window_days {
            Some(0) => return Err(ConfigError::Invalid("active_window_days must be > 0".into())),
            Some(days) => (days as i64) * 24 * 60 * 60 * 1000,
            None => defaults.active_window_ms,
        },
    };
    Ok(policy)
}

fn seconds_to_ms(raw: Option<u64>, default_ms: i64) -> Result<i64, ConfigError> {
    match raw {
        Some(0) => Err(ConfigError::Invalid("poll cadence must be > 0".into())),
        Some(seconds) => Ok((seconds as i64) * 1000),
        None => Ok(default_ms),
    }
}
