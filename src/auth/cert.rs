// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Client certificate identity provider.
//!
//! TLS is terminated outside this crate. The terminator attaches a
//! [`PeerCertificate`] to the request extensions; this provider maps its
//! subject common name to a role.

use std::collections::BTreeMap;
use std::path::Path;

use axum::http::request::Parts;
use serde::Deserialize;

use super::identity::correlation_id;
use super::provider::IdentityProvider;
use super::roles::RoleResolver;
use super::{AuthError, Identity};
use crate::config::load_yaml;
use crate::error::ConfigError;

pub const PROVIDER_NAME: &str = "cert";

/// Verified client certificate subject, supplied by the TLS terminator.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PeerCertificate {
    pub common_name: String,
    pub organization: String,
}

/// Certificate provider file.
///
/// ```yaml
/// default_role: node
/// roles:
///   cluster-admin:
///     - admin.example.com
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CertConfig {
    pub default_role: String,
    /// Role name to certificate common names
    pub roles: BTreeMap<String, Vec<String>>,
}

impl CertConfig {
    /// # Errors
    ///
    /// Fails when the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        load_yaml(path.as_ref())
    }
}

#[derive(Debug, Clone)]
pub struct CertProvider {
    roles: RoleResolver,
}

impl CertProvider {
    pub fn new(config: &CertConfig) -> Self {
        Self {
            roles: RoleResolver::new(&config.default_role, &config.roles),
        }
    }

    /// # Errors
    ///
    /// See [`CertConfig::load`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Ok(Self::new(&CertConfig::load(path)?))
    }
}

impl IdentityProvider for CertProvider {
    fn name(&self) -> &'static str {
        PROVIDER_NAME
    }

    fn applicable(&self, parts: &Parts) -> bool {
        parts.extensions.get::<PeerCertificate>().is_some()
    }

    fn verify(&self, parts: &Parts) -> Result<Option<Identity>, AuthError> {
        let Some(cert) = parts.extensions.get::<PeerCertificate>() else {
            return Ok(None);
        };

        let common_name = cert.common_name.trim();
        if common_name.is_empty() {
            return Err(AuthError::InvalidCertificate(
                "subject has no common name".to_string(),
            ));
        }

        Ok(Some(Identity::new(
            self.roles.resolve(common_name),
            common_name,
            correlation_id(parts),
        )))
    }
}
