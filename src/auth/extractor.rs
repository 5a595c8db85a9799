// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Axum extractor for the resolved caller identity.
//!
//! ```rust,ignore
//! async fn my_handler(Caller(identity): Caller) -> impl IntoResponse {
//!     // identity.role, identity.subject_name, identity.user_profile
//! }
//! ```

use axum::{extract::FromRequestParts, http::request::Parts};

use super::{AuthError, Identity};
use crate::state::AppState;

/// Caller identity for the current request.
///
/// Uses the identity stored by the `resolve_identity` middleware when it
/// ran; otherwise resolves through the chain in [`AppState`].
pub struct Caller(pub Identity);

impl FromRequestParts<AppState> for Caller {
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        if let Some(identity) = parts.extensions.get::<Identity>().cloned() {
            return Ok(Caller(identity));
        }

        let identity = state.chain.resolve(parts)?;
        parts.extensions.insert(identity.clone());
        Ok(Caller(identity))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::api_key::{ApiKeyConfig, ApiKeyEntry, ApiKeyProvider};
    use crate::auth::{ProviderChain, GUEST_ROLE};
    use axum::http::Request;
    use std::sync::Arc;

    fn state() -> AppState {
        let api_keys = ApiKeyProvider::new(&ApiKeyConfig {
            default_role: "service".to_string(),
            keys: vec![ApiKeyEntry {
                id: "billing".to_string(),
                key: "k-billing".to_string(),
                role: String::new(),
            }],
        });
        AppState::new(ProviderChain::new().with_provider(Arc::new(api_keys)))
    }

    fn parts(authorization: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/test");
        if let Some(value) = authorization {
            builder = builder.header("Authorization", value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[tokio::test]
    async fn prefers_identity_from_extensions() {
        let mut parts = parts(Some("k-unknown"));
        parts
            .extensions
            .insert(Identity::new("admin", "from-middleware", "corr-1"));

        let Caller(identity) = Caller::from_request_parts(&mut parts, &state()).await.unwrap();
        assert_eq!(identity.subject_name, "from-middleware");
    }

    #[tokio::test]
    async fn resolves_on_demand_without_middleware() {
        let mut parts = parts(Some("k-billing"));
        let Caller(identity) = Caller::from_request_parts(&mut parts, &state()).await.unwrap();
        assert_eq!(identity.role, "service");
        assert!(parts.extensions.get::<Identity>().is_some());
    }

    #[tokio::test]
    async fn anonymous_caller_is_guest() {
        let mut parts = parts(None);
        let Caller(identity) = Caller::from_request_parts(&mut parts, &state()).await.unwrap();
        assert_eq!(identity.role, GUEST_ROLE);
    }

    #[tokio::test]
    async fn rejects_unknown_key() {
        let mut parts = parts(Some("k-unknown"));
        let result = Caller::from_request_parts(&mut parts, &state()).await;
        assert!(matches!(result, Err(AuthError::InvalidApiKey)));
    }
}
