//! Runtime configuration loaded from environment variables.
//!
//! # Environment Variables
//! - `CUSTREG_DB_PATH` - SQLite file path (default: in-memory database)
//! - `CUSTREG_VIACEP_BASE_URL` - lookup endpoint (default: public ViaCEP)
//! - `CUSTREG_VIACEP_TIMEOUT_SECS` - positive request timeout (default: 10)
//! - `CUSTREG_LOG_LEVEL` - trace|debug|info|warn|error (default: build-mode based)
//! - `CUSTREG_LOG_DIR` - absolute directory for rolling log files (default: disabled)

use crate::logging::{default_log_level, normalize_level};
use crate::resolver::viacep::{ViaCepConfig, DEFAULT_VIACEP_BASE_URL, DEFAULT_VIACEP_TIMEOUT};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;
use std::time::Duration;

pub const ENV_DB_PATH: &str = "CUSTREG_DB_PATH";
pub const ENV_VIACEP_BASE_URL: &str = "CUSTREG_VIACEP_BASE_URL";
pub const ENV_VIACEP_TIMEOUT_SECS: &str = "CUSTREG_VIACEP_TIMEOUT_SECS";
pub const ENV_LOG_LEVEL: &str = "CUSTREG_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "CUSTREG_LOG_DIR";

/// Configuration loading error naming the offending variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidEnvVar { key: &'static str, reason: String },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidEnvVar { key, reason } => {
                write!(f, "invalid environment variable {key}: {reason}")
            }
        }
    }
}

impl Error for ConfigError {}

/// Core runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    /// `None` selects an in-memory database.
    pub db_path: Option<PathBuf>,
    pub viacep: ViaCepConfig,
    /// Normalized log level.
    pub log_level: &'static str,
    /// `None` disables file logging.
    pub log_dir: Option<PathBuf>,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            db_path: None,
            viacep: ViaCepConfig::default(),
            log_level: default_log_level(),
            log_dir: None,
        }
    }
}

impl CoreConfig {
    /// Loads configuration from the process environment.
    ///
    /// # Errors
    /// Returns `ConfigError` when a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads configuration through `lookup`, treating blank values as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let timeout = match get(ENV_VIACEP_TIMEOUT_SECS) {
            Some(raw) => parse_timeout_secs(&raw)?,
            None => DEFAULT_VIACEP_TIMEOUT,
        };

        let log_level = match get(ENV_LOG_LEVEL) {
            Some(raw) => normalize_level(&raw).map_err(|err| ConfigError::InvalidEnvVar {
                key: ENV_LOG_LEVEL,
                reason: err.to_string(),
            })?,
            None => default_log_level(),
        };

        let log_dir = get(ENV_LOG_DIR).map(PathBuf::from);
        if let Some(dir) = &log_dir {
            if !dir.is_absolute() {
                return Err(ConfigError::InvalidEnvVar {
                    key: ENV_LOG_DIR,
                    reason: format!("must be an absolute path, got `{}`", dir.display()),
                });
            }
        }

        Ok(Self {
            db_path: get(ENV_DB_PATH).map(PathBuf::from),
            viacep: ViaCepConfig {
                base_url: get(ENV_VIACEP_BASE_URL)
                    .unwrap_or_else(|| DEFAULT_VIACEP_BASE_URL.to_string()),
                timeout,
            },
            log_level,
            log_dir,
        })
    }
}

fn parse_timeout_secs(raw: &str) -> Result<Duration, ConfigError> {
    match raw.parse::<u64>() {
        Ok(0) => Err(ConfigError::InvalidEnvVar {
            key: ENV_VIACEP_TIMEOUT_SECS,
            reason: "must be greater than zero".to_string(),
        }),
        Ok(secs) => Ok(Duration::from_secs(secs)),
        Err(err) => Err(ConfigError::InvalidEnvVar {
            key: ENV_VIACEP_TIMEOUT_SECS,
            reason: err.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, CoreConfig, ENV_LOG_DIR, ENV_VIACEP_TIMEOUT_SECS};
    use std::collections::HashMap;
    use std::path::PathBuf;
    use std::time::Duration;

    fn load(vars: &[(&str, &str)]) -> Result<CoreConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        CoreConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn empty_environment_yields_defaults() {
        assert_eq!(load(&[]).unwrap(), CoreConfig::default());
    }

    #[test]
    fn values_are_read_and_trimmed() {
        let config = load(&[
            ("CUSTREG_DB_PATH", " /var/lib/custreg.db "),
            ("CUSTREG_VIACEP_BASE_URL", "http://localhost:9000/ws"),
            ("CUSTREG_VIACEP_TIMEOUT_SECS", "3"),
            ("CUSTREG_LOG_LEVEL", "WARNING"),
        ])
        .unwrap();

        assert_eq!(config.db_path, Some(PathBuf::from("/var/lib/custreg.db")));
        assert_eq!(config.viacep.base_url, "http://localhost:9000/ws");
        assert_eq!(config.viacep.timeout, Duration::from_secs(3));
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.log_dir, None);
    }

    #[test]
    fn zero_or_garbage_timeout_is_rejected() {
        for raw in ["0", "soon"] {
            let err = load(&[("CUSTREG_VIACEP_TIMEOUT_SECS", raw)]).unwrap_err();
            assert!(matches!(
                err,
                ConfigError::InvalidEnvVar { key, .. } if key == ENV_VIACEP_TIMEOUT_SECS
            ));
        }
    }

    #[test]
    fn relative_log_dir_is_rejected() {
        let err = load(&[("CUSTREG_LOG_DIR", "logs")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar { key, .. } if key == ENV_LOG_DIR));
    }
}
