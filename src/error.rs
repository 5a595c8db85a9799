// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Start-up configuration errors.

use std::path::PathBuf;

/// Failure to load or validate provider configuration.
///
/// Every variant is fatal to chain construction and therefore to start-up.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("unable to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unable to unmarshal {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("missing kid: {0:?}")]
    MissingKeyId(PathBuf),

    #[error("missing keys: {0:?}")]
    MissingKeys(PathBuf),

    #[error("key set is empty")]
    EmptyKeySet,

    #[error("failed to load {mapper} mapper: {source}")]
    Mapper {
        mapper: &'static str,
        #[source]
        source: Box<ConfigError>,
    },

    #[error("invalid value for {name}: {value:?}")]
    InvalidEnv { name: &'static str, value: String },
}

impl ConfigError {
    /// Annotate a provider load failure with the mapper that produced it.
    pub fn for_mapper(mapper: &'static str, source: ConfigError) -> Self {
        ConfigError::Mapper {
            mapper,
            source: Box::new(source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_kid_names_the_file() {
        let err = ConfigError::MissingKeyId(PathBuf::from("testdata/roles_no_kid.yaml"));
        assert_eq!(err.to_string(), r#"missing kid: "testdata/roles_no_kid.yaml""#);
    }

    #[test]
    fn mapper_annotation_prefixes_the_cause() {
        let err = ConfigError::for_mapper(
            "JWT",
            ConfigError::MissingKeys(PathBuf::from("jwt.yaml")),
        );
        assert_eq!(
            err.to_string(),
            r#"failed to load JWT mapper: missing keys: "jwt.yaml""#
        );
        assert!(std::error::Error::source(&err).is_some());
    }
}
