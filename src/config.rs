use std::net::SocketAddr;
use std::path::PathBuf;

use thiserror::Error;

/// Application-level constants
pub const APP_NAME: &str = "Doseplan";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Database file name inside the data directory.
pub const DATABASE_FILE: &str = "doseplan.db";

/// Bind address used when `DOSEPLAN_BIND` is unset.
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8787";

/// Get the application data directory
/// ~/Doseplan/ on all platforms, falling back to the working directory
/// when no home directory can be resolved.
pub fn app_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

/// Default `tracing` filter when `RUST_LOG` is not set.
pub fn default_log_filter() -> &'static str {
    "doseplan_lib=info,doseplan=info,tower_http=warn"
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value for {var}: {value} ({reason})")]
    InvalidValue {
        var: &'static str,
        value: String,
        reason: String,
    },
}

/// Runtime configuration for the HTTP service.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub data_dir: PathBuf,
}

impl ServerConfig {
    /// Read `DOSEPLAN_BIND` and `DOSEPLAN_DATA_DIR`, falling back to defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let raw_bind = lookup("DOSEPLAN_BIND").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = raw_bind
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidValue {
                var: "DOSEPLAN_BIND",
                value: raw_bind.clone(),
                reason: e.to_string(),
            })?;

        let data_dir = match lookup("DOSEPLAN_DATA_DIR") {
            Some(dir) if dir.trim().is_empty() => {
                return Err(ConfigError::InvalidValue {
                    var: "DOSEPLAN_DATA_DIR",
                    value: dir,
                    reason: "must not be empty".into(),
                })
            }
            Some(dir) => PathBuf::from(dir),
            None => app_data_dir(),
        };

        Ok(Self {
            bind_addr,
            data_dir,
        })
    }

    /// Full path of the SQLite database file.
    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join(DATABASE_FILE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn app_data_dir_ends_with_app_name() {
        assert!(app_data_dir().ends_with("Doseplan"));
    }

    #[test]
    fn defaults_when_env_empty() {
        let config = ServerConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.bind_addr.to_string(), DEFAULT_BIND_ADDR);
        assert_eq!(config.data_dir, app_data_dir());
        assert!(config.database_path().ends_with(DATABASE_FILE));
    }

    #[test]
    fn env_overrides_bind_and_data_dir() {
        let config = ServerConfig::from_lookup(lookup_from(&[
            ("DOSEPLAN_BIND", "0.0.0.0:9000"),
            ("DOSEPLAN_DATA_DIR", "/var/lib/doseplan"),
        ]))
        .unwrap();
        assert_eq!(config.bind_addr.port(), 9000);
        assert_eq!(
            config.database_path(),
            PathBuf::from("/var/lib/doseplan").join(DATABASE_FILE)
        );
    }

    #[test]
    fn invalid_bind_is_rejected() {
        let err = ServerConfig::from_lookup(lookup_from(&[("DOSEPLAN_BIND", "not-an-addr")]))
            .unwrap_err();
        assert!(err.to_string().contains("DOSEPLAN_BIND"));
    }

    #[test]
    fn blank_data_dir_is_rejected() {
        let result = ServerConfig::from_lookup(lookup_from(&[("DOSEPLAN_DATA_DIR", "  ")]));
        assert!(result.is_err());
    }

    #[test]
    fn app_version_matches_cargo() {
        assert_eq!(APP_VERSION, "0.1.0");
    }
}
