// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Symmetric signing keys addressed by key id.
//!
//! ## Security
//!
//! - Runtime secrets are `SHA-256(seed)`; configured seeds are not retained
//! - Secrets never appear in `Debug` output
//! - The key set is fixed for the lifetime of a store (no hot reload)

use std::collections::HashMap;

use serde::Deserialize;
use sha2::{Digest, Sha256};

use crate::error::ConfigError;

/// A configured key entry, as read from the provider file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct KeySeed {
    pub id: String,
    pub seed: String,
}

/// Derived signing key.
#[derive(Clone)]
pub struct SigningKey {
    pub id: String,
    secret: [u8; 32],
}

impl SigningKey {
    /// Derive a key from its configured seed.
    pub fn derive(id: impl Into<String>, seed: &str) -> Self {
        Self {
            id: id.into(),
            secret: Sha256::digest(seed.as_bytes()).into(),
        }
    }

    pub fn secret(&self) -> &[u8] {
        &self.secret
    }
}

impl std::fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigningKey")
            .field("id", &self.id)
            .field("secret", &"<redacted>")
            .finish()
    }
}

/// Immutable set of signing keys with a designated current key.
#[derive(Debug, Clone)]
pub struct KeyStore {
    keys: HashMap<String, SigningKey>,
    current_kid: String,
    /// Last configured key; signs when `current_kid` is not in the set.
    fallback: SigningKey,
}

impl KeyStore {
    /// Derive the runtime key set.
    ///
    /// An empty `current_kid` selects the last configured key. Later entries
    /// replace earlier entries with the same id.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyKeySet`] when `entries` is empty.
    pub fn load(entries: &[KeySeed], current_kid: &str) -> Result<Self, ConfigError> {
        let last = entries.last().ok_or(ConfigError::EmptyKeySet)?;
        let fallback = SigningKey::derive(&last.id, &last.seed);

        let keys: HashMap<String, SigningKey> = entries
            .iter()
            .map(|entry| (entry.id.clone(), SigningKey::derive(&entry.id, &entry.seed)))
            .collect();

        let current_kid = if current_kid.is_empty() {
            fallback.id.clone()
        } else {
            current_kid.to_string()
        };

        if !keys.contains_key(&current_kid) {
            tracing::warn!(
                kid = %current_kid,
                fallback = %fallback.id,
                "Configured current key is not in the key set; signing with the last configured key"
            );
        }

        Ok(Self {
            keys,
            current_kid,
            fallback,
        })
    }

    /// Key used for signing new tokens.
    pub fn current_key(&self) -> &SigningKey {
        self.keys.get(&self.current_kid).unwrap_or(&self.fallback)
    }

    /// Whether the configured current key id names a key in the set.
    pub fn current_kid_configured(&self) -> bool {
        self.keys.contains_key(&self.current_kid)
    }

    /// Secret for `kid`, used during verification.
    pub fn lookup(&self, kid: &str) -> Option<&SigningKey> {
        self.keys.get(kid)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}
