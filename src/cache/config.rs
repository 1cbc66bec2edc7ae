use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// TTL applied when a cache is built without explicit configuration.
pub const DEFAULT_TTL_MS: i64 = 1000;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("time-to-live must be non-negative, got {0} ms")]
    NegativeTtl(i64),
}

/// Cache tuning knobs, deserializable from an application config file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Time-to-live in milliseconds. Kept signed so a negative value coming
    /// from a config file is caught at validation instead of wrapping into
    /// an enormous unsigned TTL.
    #[serde(default = "default_ttl_ms")]
    pub time_to_live_ms: i64,
}

fn default_ttl_ms() -> i64 {
    DEFAULT_TTL_MS
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            time_to_live_ms: DEFAULT_TTL_MS,
        }
    }
}

impl CacheConfig {
    pub fn new(time_to_live_ms: i64) -> Self {
        Self { time_to_live_ms }
    }

    /// Fails fast on a negative TTL, otherwise hands it back as a `Duration`.
    pub fn validate(&self) -> Result<Duration, ConfigError> {
        if self.time_to_live_ms < 0 {
            return Err(ConfigError::NegativeTtl(self.time_to_live_ms));
        }
        Ok(Duration::from_millis(self.time_to_live_ms as u64))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_ttl_is_one_second() {
        let config = CacheConfig::default();
        assert_eq!(config.validate(), Ok(Duration::from_millis(1000)));
    }

    #[test]
    fn negative_ttl_is_rejected() {
        let config = CacheConfig::new(-1);
        assert_eq!(config.validate(), Err(ConfigError::NegativeTtl(-1)));
    }

    #[test]
    fn zero_ttl_is_allowed() {
        let config = CacheConfig::new(0);
        assert_eq!(config.validate(), Ok(Duration::ZERO));
    }

    #[test]
    fn deserializes_from_json() {
        let config: CacheConfig = serde_json::from_str(r#"{"time_to_live_ms": 250}"#).unwrap();
        assert_eq!(config, CacheConfig::new(250));

        let defaulted: CacheConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(defaulted, CacheConfig::default());
    }
}
