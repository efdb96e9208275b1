//! Runner configuration loaded from `LPM_*` environment variables.

use std::collections::HashMap;
use std::str::FromStr;
use thiserror::Error;

/// Errors raised while loading or validating [`RunnerConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Key and offending value.
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

/// Configuration for the project runner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunnerConfig {
    /// Seconds between evaluation cycles.
    pub eval_interval_secs: u64,
    /// Projects evaluated concurrently within one cycle.
    pub max_concurrent_projects: usize,
    /// Consecutive failed cycles before a project's breaker opens.
    pub max_consecutive_failures: u32,
    /// Seconds an open breaker waits before a trial cycle.
    pub recovery_timeout_secs: u64,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            eval_interval_secs: 60,
            max_concurrent_projects: 4,
            max_consecutive_failures: 3,
            recovery_timeout_secs: 300, // 5 minutes
        }
    }
}

impl RunnerConfig {
    /// Loads from the process environment, falling back to defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_map(std::env::vars().collect())
    }

    /// Loads from `env_map`. Missing keys take their defaults; the result
    /// is validated.
    pub fn from_env_map(env_map: HashMap<String, String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let config = Self {
            eval_interval_secs: parse_or(
                &env_map,
                "LPM_EVAL_INTERVAL_SECS",
                defaults.eval_interval_secs,
            )?,
            max_concurrent_projects: parse_or(
                &env_map,
                "LPM_MAX_CONCURRENT_PROJECTS",
                defaults.max_concurrent_projects,
            )?,
            max_consecutive_failures: parse_or(
                &env_map,
                "LPM_MAX_CONSECUTIVE_FAILURES",
                defaults.max_consecutive_failures,
            )?,
            recovery_timeout_secs: parse_or(
                &env_map,
                "LPM_RECOVERY_TIMEOUT_SECS",
                defaults.recovery_timeout_secs,
            )?,
        };

        config.validate()?;
        Ok(config)
    }

    /// Rejects values the runner cannot operate with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.eval_interval_secs == 0 {
            return Err(ConfigError::InvalidValue(
                "LPM_EVAL_INTERVAL_SECS".to_string(),
                "must be greater than zero".to_string(),
            ));
        }
        if self.max_concurrent_projects == 0 {
            return Err(ConfigError::InvalidValue(
                "LPM_MAX_CONCURRENT_PROJECTS".to_string(),
                "must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

fn parse_or<T: FromStr>(
    env_map: &HashMap<String, String>,
    key: &str,
    default: T,
) -> Result<T, ConfigError> {
    match env_map.get(key) {
        None => Ok(default),
        Some(raw) => raw.trim().parse::<T>().map_err(|_| {
            ConfigError::InvalidValue(key.to_string(), format!("cannot parse {raw:?}"))
        }),
    }
}
