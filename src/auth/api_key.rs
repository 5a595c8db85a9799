// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! API key identity provider.
//!
//! A raw key sent as the whole `Authorization` header value (no `Bearer`
//! scheme) is mapped to a configured identity. Only SHA-256 digests of the
//! configured keys are held at runtime.

use std::collections::HashMap;
use std::path::Path;

use axum::http::{header::AUTHORIZATION, request::Parts};
use serde::Deserialize;
use sha2::{Digest, Sha256};

use super::identity::{correlation_id, has_bearer_scheme, header_str};
use super::provider::IdentityProvider;
use super::roles::GUEST_ROLE;
use super::{AuthError, Identity};
use crate::config::load_yaml;
use crate::error::ConfigError;

pub const PROVIDER_NAME: &str = "api-key";

/// A configured API key.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiKeyEntry {
    /// Subject name reported for callers using this key
    pub id: String,
    pub key: String,
    /// Role for this key; empty means the default role
    #[serde(default)]
    pub role: String,
}

/// API key provider file.
///
/// ```yaml
/// default_role: service
/// keys:
///   - id: billing-service
///     key: "..."
///     role: billing
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ApiKeyConfig {
    pub default_role: String,
    pub keys: Vec<ApiKeyEntry>,
}

impl ApiKeyConfig {
    /// Load the provider file.
    ///
    /// # Errors
    ///
    /// Fails when the file cannot be read or parsed, or lists no keys.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let config: ApiKeyConfig = load_yaml(path)?;
        if config.keys.is_empty() {
            return Err(ConfigError::MissingKeys(path.to_path_buf()));
        }
        Ok(config)
    }
}

#[derive(Debug, Clone)]
struct KeyIdentity {
    id: String,
    role: String,
}

/// Maps raw API keys to identities.
#[derive(Debug, Clone)]
pub struct ApiKeyProvider {
    keys: HashMap<[u8; 32], KeyIdentity>,
}

impl ApiKeyProvider {
    pub fn new(config: &ApiKeyConfig) -> Self {
        let default_role = if config.default_role.is_empty() {
            GUEST_ROLE
        } else {
            config.default_role.as_str()
        };

        let keys = config
            .keys
            .iter()
            .map(|entry| {
                let role = if entry.role.is_empty() {
                    default_role.to_string()
                } else {
                    entry.role.clone()
                };
                (
                    digest(&entry.key),
                    KeyIdentity {
                        id: entry.id.clone(),
                        role,
                    },
                )
            })
            .collect();

        Self { keys }
    }

    /// # Errors
    ///
    /// See [`ApiKeyConfig::load`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Ok(Self::new(&ApiKeyConfig::load(path)?))
    }
}

fn digest(key: &str) -> [u8; 32] {
    Sha256::digest(key.as_bytes()).into()
}

fn presented_key(parts: &Parts) -> &str {
    header_str(parts, AUTHORIZATION).trim()
}

impl IdentityProvider for ApiKeyProvider {
    fn name(&self) -> &'static str {
        PROVIDER_NAME
    }

    fn applicable(&self, parts: &Parts) -> bool {
        let value = header_str(parts, AUTHORIZATION);
        !value.trim().is_empty() && !has_bearer_scheme(value)
    }

    fn verify(&self, parts: &Parts) -> Result<Option<Identity>, AuthError> {
        if !self.applicable(parts) {
            return Ok(None);
        }

        let entry = self
            .keys
            .get(&digest(presented_key(parts)))
            .ok_or(AuthError::InvalidApiKey)?;

        Ok(Some(Identity::new(
            entry.role.clone(),
            entry.id.clone(),
            correlation_id(parts),
        )))
    }
}
