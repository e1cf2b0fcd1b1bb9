//! Relay configuration.
//!
//! Every setting has a default except the two endpoints (database, queue),
//! which the binaries require at startup. Environment keys:
//!
//! | key | default |
//! |-----|---------|
//! | `RELAY_DATABASE_URL` | - |
//! | `RELAY_QUEUE_URL` | - |
//! | `RELAY_TABLE` | `outbound_messages` |
//! | `RELAY_BATCH_SIZE` | `100` |
//! | `RELAY_MAX_CYCLES` | `20` (`unlimited` for none) |
//! | `RELAY_CYCLE_DELAY_MS` | `3000` |
//! | `RELAY_SAFETY_MARGIN_MS` | `5000` |
//! | `RELAY_DB_MAX_CONNECTIONS` | `2` |

use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

pub const ENV_DATABASE_URL: &str = "RELAY_DATABASE_URL";
pub const ENV_QUEUE_URL: &str = "RELAY_QUEUE_URL";
pub const ENV_TABLE: &str = "RELAY_TABLE";
pub const ENV_BATCH_SIZE: &str = "RELAY_BATCH_SIZE";
pub const ENV_MAX_CYCLES: &str = "RELAY_MAX_CYCLES";
pub const ENV_CYCLE_DELAY_MS: &str = "RELAY_CYCLE_DELAY_MS";
pub const ENV_SAFETY_MARGIN_MS: &str = "RELAY_SAFETY_MARGIN_MS";
pub const ENV_DB_MAX_CONNECTIONS: &str = "RELAY_DB_MAX_CONNECTIONS";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be configured")]
    Missing(&'static str),

    #[error("invalid value {value:?} for {key}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayConfig {
    pub database_url: Option<String>,
    pub queue_url: Option<String>,
    pub table: String,
    /// 1 サイクルで claim する最大件数
    pub batch_size: usize,
    /// 1 回の起動で回すサイクル数。`None` なら予算切れかキャンセルまで
    pub max_cycles: Option<u32>,
    pub cycle_delay: Duration,
    /// 残り実行時間がこれを下回ったら次のサイクルを始めない
    pub safety_margin: Duration,
    pub db_max_connections: u32,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            database_url: None,
            queue_url: None,
            table: "outbound_messages".to_string(),
            batch_size: 100,
            max_cycles: Some(20),
            cycle_delay: Duration::from_secs(3),
            safety_margin: Duration::from_secs(5),
            db_max_connections: 2,
        }
    }
}

impl RelayConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 任意の lookup から組み立てる。未設定のキーはデフォルトのまま
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        config.database_url = get(ENV_DATABASE_URL);
        config.queue_url = get(ENV_QUEUE_URL);
        if let Some(table) = get(ENV_TABLE) {
            config.table = table;
        }
        if let Some(raw) = get(ENV_BATCH_SIZE) {
            config.batch_size = parse(ENV_BATCH_SIZE, &raw)?;
            if config.batch_size == 0 {
                return Err(invalid(ENV_BATCH_SIZE, &raw, "must be at least 1"));
            }
        }
        if let Some(raw) = get(ENV_MAX_CYCLES) {
            config.max_cycles = if raw.trim().eq_ignore_ascii_case("unlimited") {
                None
            } else {
                Some(parse(ENV_MAX_CYCLES, &raw)?)
            };
        }
        if let Some(raw) = get(ENV_CYCLE_DELAY_MS) {
            config.cycle_delay = Duration::from_millis(parse(ENV_CYCLE_DELAY_MS, &raw)?);
        }
        if let Some(raw) = get(ENV_SAFETY_MARGIN_MS) {
            config.safety_margin = Duration::from_millis(parse(ENV_SAFETY_MARGIN_MS, &raw)?);
        }
        if let Some(raw) = get(ENV_DB_MAX_CONNECTIONS) {
            config.db_max_connections = parse(ENV_DB_MAX_CONNECTIONS, &raw)?;
        }
        Ok(config)
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn with_max_cycles(mut self, max_cycles: Option<u32>) -> Self {
        self.max_cycles = max_cycles;
        self
    }

    pub fn with_queue_url(mut self, url: impl Into<String>) -> Self {
        self.queue_url = Some(url.into());
        self
    }

    pub fn require_database_url(&self) -> Result<&str, ConfigError> {
        self.database_url
            .as_deref()
            .ok_or(ConfigError::Missing(ENV_DATABASE_URL))
    }

    pub fn require_queue_url(&self) -> Result<&str, ConfigError> {
        self.queue_url
            .as_deref()
            .ok_or(ConfigError::Missing(ENV_QUEUE_URL))
    }
}

fn parse<T>(key: &'static str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse()
        .map_err(|err: T::Err| invalid(key, raw, &err.to_string()))
}

fn invalid(key: &'static str, value: &str, reason: &str) -> ConfigError {
    ConfigError::Invalid {
        key,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}
