//! Process configuration, read from environment variables.
//!
//! | variable | default |
//! |---|---|
//! | `HOST` | `0.0.0.0` |
//! | `PORT` | `3000` |
//! | `FITTRACK_STORAGE` | `postgres` when `DATABASE_URL` is set, else `memory` |
//! | `DATABASE_URL` | required for `postgres` |
//! | `DATABASE_MAX_CONNECTIONS` | `5` |

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use thiserror::Error;

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid {var}: {reason}")]
    Invalid { var: &'static str, reason: String },

    #[error("{0} must be set for postgres storage")]
    Missing(&'static str),
}

/// Which storage backend to run against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageConfig {
    InMemory,
    Postgres {
        database_url: String,
        max_connections: u32,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub storage: StorageConfig,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let host: IpAddr = match var("HOST") {
            Some(raw) => raw.trim().parse().map_err(|e| ConfigError::Invalid {
                var: "HOST",
                reason: format!("{e}"),
            })?,
            None => IpAddr::V4(Ipv4Addr::UNSPECIFIED),
        };

        let port: u16 = match var("PORT") {
            Some(raw) => raw.trim().parse().map_err(|e| ConfigError::Invalid {
                var: "PORT",
                reason: format!("{e}"),
            })?,
            None => DEFAULT_PORT,
        };

        let database_url = var("DATABASE_URL");
        let backend = var("FITTRACK_STORAGE").map(|v| v.trim().to_ascii_lowercase());

        let storage = match backend.as_deref() {
            Some("memory") | Some("in-memory") => StorageConfig::InMemory,
            Some("postgres") | Some("postgresql") => postgres(database_url, &var)?,
            None if database_url.is_some() => postgres(database_url, &var)?,
            None => StorageConfig::InMemory,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    var: "FITTRACK_STORAGE",
                    reason: format!("unknown backend {other:?} (expected memory or postgres)"),
                });
            }
        };

        Ok(Self {
            bind_addr: SocketAddr::new(host, port),
            storage,
        })
    }
}

fn postgres(
    database_url: Option<String>,
    var: &impl Fn(&str) -> Option<String>,
) -> Result<StorageConfig, ConfigError> {
    let database_url = database_url.ok_or(ConfigError::Missing("DATABASE_URL"))?;
    let max_connections = match var("DATABASE_MAX_CONNECTIONS") {
        Some(raw) => raw
            .trim()
            .parse::<u32>()
            .ok()
            .filter(|n| *n > 0)
            .ok_or_else(|| ConfigError::Invalid {
                var: "DATABASE_MAX_CONNECTIONS",
                reason: format!("expected a positive integer, got {raw:?}"),
            })?,
        None => DEFAULT_MAX_CONNECTIONS,
    };

    Ok(StorageConfig::Postgres {
        database_url,
        max_connections,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_to_in_memory_on_port_3000() {
        let cfg = load(&[]).unwrap();
        assert_eq!(cfg.bind_addr, "0.0.0.0:3000".parse().unwrap());
        assert_eq!(cfg.storage, StorageConfig::InMemory);
    }

    #[test]
    fn database_url_selects_postgres() {
        let cfg = load(&[("DATABASE_URL", "postgres://localhost/fittrack"), ("PORT", "8080")]).unwrap();
        assert_eq!(cfg.bind_addr.port(), 8080);
        assert_eq!(
            cfg.storage,
            StorageConfig::Postgres {
                database_url: "postgres://localhost/fittrack".to_string(),
                max_connections: 5,
            }
        );
    }

    #[test]
    fn explicit_memory_wins_over_database_url() {
        let cfg = load(&[
            ("DATABASE_URL", "postgres://localhost/fittrack"),
            ("FITTRACK_STORAGE", "Memory"),
        ])
        .unwrap();
        assert_eq!(cfg.storage, StorageConfig::InMemory);
    }

    #[test]
    fn postgres_without_url_is_rejected() {
        let err = load(&[("FITTRACK_STORAGE", "postgres")]).unwrap_err();
        assert_eq!(err, ConfigError::Missing("DATABASE_URL"));
    }

    #[test]
    fn malformed_values_are_rejected() {
        assert!(matches!(
            load(&[("PORT", "eighty")]),
            Err(ConfigError::Invalid { var: "PORT", .. })
        ));
        assert!(matches!(
            load(&[("HOST", "not-an-ip")]),
            Err(ConfigError::Invalid { var: "HOST", .. })
        ));
        assert!(matches!(
            load(&[("FITTRACK_STORAGE", "mongo")]),
            Err(ConfigError::Invalid { var: "FITTRACK_STORAGE", .. })
        ));
        assert!(matches!(
            load(&[("DATABASE_URL", "postgres://x"), ("DATABASE_MAX_CONNECTIONS", "0")]),
            Err(ConfigError::Invalid { var: "DATABASE_MAX_CONNECTIONS", .. })
        ));
    }
}
