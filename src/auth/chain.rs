// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Ordered credential provider chain.
//!
//! Precedence is JWT, then API key, then client certificate. The first
//! applicable provider owns the request: its result is returned as-is and no
//! other provider is tried, even on failure. Requests no provider claims
//! resolve to the guest identity.

use std::sync::Arc;

use axum::http::request::Parts;

use super::api_key::ApiKeyProvider;
use super::cert::CertProvider;
use super::guest::guest_identity;
use super::jwt::JwtProvider;
use super::provider::IdentityProvider;
use super::{AuthError, Identity};
use crate::error::ConfigError;

/// Resolves exactly one identity per request.
#[derive(Clone, Default)]
pub struct ProviderChain {
    jwt: Option<Arc<JwtProvider>>,
    providers: Vec<Arc<dyn IdentityProvider>>,
}

impl ProviderChain {
    /// Chain with no providers; every request resolves to the guest.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the chain from provider files. Empty paths leave the scheme
    /// unconfigured.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Mapper`] naming the provider whose file failed
    /// to load.
    pub fn from_files(jwt: &str, api_key: &str, cert: &str) -> Result<Self, ConfigError> {
        let mut chain = Self::new();

        if !jwt.is_empty() {
            let provider =
                JwtProvider::load(jwt).map_err(|e| ConfigError::for_mapper("JWT", e))?;
            chain = chain.with_jwt(provider);
        }
        if !api_key.is_empty() {
            let provider =
                ApiKeyProvider::load(api_key).map_err(|e| ConfigError::for_mapper("API-Key", e))?;
            chain = chain.with_provider(Arc::new(provider));
        }
        if !cert.is_empty() {
            let provider =
                CertProvider::load(cert).map_err(|e| ConfigError::for_mapper("cert", e))?;
            chain = chain.with_provider(Arc::new(provider));
        }

        tracing::info!(providers = ?chain.provider_names(), "Identity provider chain ready");
        Ok(chain)
    }

    /// Append the JWT provider; it also becomes the chain's token signer.
    pub fn with_jwt(mut self, provider: JwtProvider) -> Self {
        let provider = Arc::new(provider);
        self.jwt = Some(Arc::clone(&provider));
        self.providers.push(provider);
        self
    }

    /// Append a provider at the lowest precedence so far.
    pub fn with_provider(mut self, provider: Arc<dyn IdentityProvider>) -> Self {
        self.providers.push(provider);
        self
    }

    /// Configured JWT provider, for token issuance.
    pub fn jwt(&self) -> Option<&JwtProvider> {
        self.jwt.as_deref()
    }

    pub fn provider_names(&self) -> Vec<&'static str> {
        self.providers.iter().map(|p| p.name()).collect()
    }

    /// Resolve the caller identity for a request.
    ///
    /// # Errors
    ///
    /// Returns the owning provider's [`AuthError`]. A provider that claims
    /// the request but finds no credential in it yields
    /// [`AuthError::InvalidAuthHeader`].
    pub fn resolve(&self, parts: &Parts) -> Result<Identity, AuthError> {
        let Some(provider) = self.providers.iter().find(|p| p.applicable(parts)) else {
            return Ok(guest_identity(parts));
        };

        match provider.verify(parts)? {
            Some(identity) => Ok(identity),
            None => Err(AuthError::InvalidAuthHeader),
        }
    }
}

impl std::fmt::Debug for ProviderChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderChain")
            .field("providers", &self.provider_names())
            .finish()
    }
}
