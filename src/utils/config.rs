use std::{str::FromStr, time::Duration};

use crate::models::error::ConfigError;

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: String,
    pub provider_base_url: String,
    pub tracked_unit: String,
    pub upstream_timeout: Duration,
    pub cache_ttl: chrono::Duration,
    pub cache_sweep_interval: Option<Duration>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            bind_addr: "0.0.0.0:8080".to_string(),
            provider_base_url: "https://api.exchangeratesapi.io".to_string(),
            tracked_unit: "GBP".to_string(),
            upstream_timeout: Duration::from_millis(500),
            cache_ttl: chrono::Duration::seconds(3600),
            cache_sweep_interval: Some(Duration::from_secs(60)),
        }
    }
}

impl Config {
    pub fn init() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();

        let timeout_ms: u64 = parse_var(&lookup, "UPSTREAM_TIMEOUT_MS", 500)?;
        let ttl_secs: i64 = parse_var(&lookup, "CACHE_TTL_SECS", 3600)?;
        let cache_ttl = ttl_from_secs(ttl_secs)?;
        let sweep_secs: u64 = parse_var(&lookup, "CACHE_SWEEP_SECS", 60)?;

        Ok(Config {
            bind_addr: lookup("BIND_ADDR").unwrap_or(defaults.bind_addr),
            provider_base_url: lookup("PROVIDER_BASE_URL").unwrap_or(defaults.provider_base_url),
            tracked_unit: lookup("TRACKED_UNIT").unwrap_or(defaults.tracked_unit),
            upstream_timeout: Duration::from_millis(timeout_ms),
            cache_ttl,
            cache_sweep_interval: (sweep_secs > 0).then(|| Duration::from_secs(sweep_secs)),
        })
    }
}

// Rejects TTLs whose deadline would not fit in a timestamp.
fn ttl_from_secs(secs: i64) -> Result<chrono::Duration, ConfigError> {
    chrono::Duration::try_seconds(secs)
        .filter(|ttl| chrono::Utc::now().checked_add_signed(*ttl).is_some())
        .ok_or_else(|| ConfigError::Invalid {
            name: "CACHE_TTL_SECS",
            value: secs.to_string(),
            reason: "out of range".to_string(),
        })
}

fn parse_var<F, T>(lookup: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(name) {
        None => Ok(default),
        Some(value) => value.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            name,
            reason: e.to_string(),
            value,
        }),
    }
}
