// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Credential-scheme provider contract.

use axum::http::request::Parts;

use super::{AuthError, Identity};

/// A credential scheme the provider chain can route requests to.
///
/// Implementations are immutable after construction and shared across
/// request tasks.
pub trait IdentityProvider: Send + Sync {
    /// Short scheme name used in logs.
    fn name(&self) -> &'static str;

    /// Whether the request carries a credential of this scheme.
    ///
    /// Syntactic check only; it never authorizes anything by itself.
    fn applicable(&self, parts: &Parts) -> bool;

    /// Extract and verify the identity carried by the request.
    ///
    /// Returns `Ok(None)` when the request holds no credential for this
    /// scheme.
    ///
    /// # Errors
    ///
    /// Returns an [`AuthError`] describing why a present credential was
    /// rejected.
    fn verify(&self, parts: &Parts) -> Result<Option<Identity>, AuthError>;
}
