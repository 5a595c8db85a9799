// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! Environment variable names, defaults, and the YAML loader shared by the
//! credential providers. Configuration is read once at startup.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `JWT_MAPPER` | Path to the JWT provider YAML file | unset (provider disabled) |
//! | `API_KEY_MAPPER` | Path to the API-key provider YAML file | unset (provider disabled) |
//! | `CERT_MAPPER` | Path to the client-certificate provider YAML file | unset (provider disabled) |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::env;
use std::path::Path;

use serde::de::DeserializeOwned;

use crate::error::ConfigError;

pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";
pub const JWT_MAPPER_ENV: &str = "JWT_MAPPER";
pub const API_KEY_MAPPER_ENV: &str = "API_KEY_MAPPER";
pub const CERT_MAPPER_ENV: &str = "CERT_MAPPER";
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_LOG_FILTER: &str = "info,tower_http=debug";

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    Json,
    #[default]
    Pretty,
}

/// Process settings gathered from the environment.
#[derive(Debug, Clone)]
pub struct Settings {
    pub host: String,
    pub port: u16,
    /// Provider file paths; empty means the provider is not configured.
    pub jwt_mapper: String,
    pub api_key_mapper: String,
    pub cert_mapper: String,
    pub log_format: LogFormat,
}

impl Settings {
    /// Read settings from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidEnv`] when `PORT` or `LOG_FORMAT` hold
    /// values that cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build settings from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let port = match lookup(PORT_ENV) {
            Some(value) => value.parse().map_err(|_| ConfigError::InvalidEnv {
                name: PORT_ENV,
                value,
            })?,
            None => DEFAULT_PORT,
        };

        let log_format = match lookup(LOG_FORMAT_ENV).as_deref() {
            None | Some("pretty") => LogFormat::Pretty,
            Some("json") => LogFormat::Json,
            Some(other) => {
                return Err(ConfigError::InvalidEnv {
                    name: LOG_FORMAT_ENV,
                    value: other.to_string(),
                })
            }
        };

        Ok(Self {
            host: lookup(HOST_ENV).unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            jwt_mapper: lookup(JWT_MAPPER_ENV).unwrap_or_default(),
            api_key_mapper: lookup(API_KEY_MAPPER_ENV).unwrap_or_default(),
            cert_mapper: lookup(CERT_MAPPER_ENV).unwrap_or_default(),
            log_format,
        })
    }
}

/// Read and deserialize a YAML provider file.
pub(crate) fn load_yaml<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_yaml::from_str(&raw).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn defaults_apply_when_unset() {
        let settings = Settings::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(settings.host, DEFAULT_HOST);
        assert_eq!(settings.port, DEFAULT_PORT);
        assert!(settings.jwt_mapper.is_empty());
        assert_eq!(settings.log_format, LogFormat::Pretty);
    }

    #[test]
    fn reads_mapper_paths_and_format() {
        let settings = Settings::from_lookup(lookup_from(&[
            (JWT_MAPPER_ENV, "/etc/identity/jwt.yaml"),
            (LOG_FORMAT_ENV, "json"),
            (PORT_ENV, "9090"),
        ]))
        .unwrap();
        assert_eq!(settings.jwt_mapper, "/etc/identity/jwt.yaml");
        assert_eq!(settings.log_format, LogFormat::Json);
        assert_eq!(settings.port, 9090);
    }

    #[test]
    fn rejects_bad_port() {
        let err = Settings::from_lookup(lookup_from(&[(PORT_ENV, "http")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnv { name: PORT_ENV, .. }));
    }

    #[test]
    fn load_yaml_reports_missing_file() {
        let err = load_yaml::<serde_yaml::Value>(Path::new("/nonexistent/roles.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
