// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Identity resolution middleware for Axum.
//!
//! Runs the provider chain once per request and stores the resulting
//! [`Identity`](super::Identity) in the request extensions, where the
//! [`Caller`](super::Caller) extractor and audit code pick it up.
//!
//! ```rust,ignore
//! let app = Router::new()
//!     .route("/whoami", get(whoami))
//!     .route_layer(axum::middleware::from_fn_with_state(
//!         state.clone(),
//!         resolve_identity,
//!     ))
//!     .with_state(state);
//! ```

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::state::AppState;

/// Resolve the caller identity or reject the request.
pub async fn resolve_identity(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let (mut parts, body) = request.into_parts();

    match state.chain.resolve(&parts) {
        Ok(identity) => {
            tracing::debug!(
                role = %identity.role,
                subject = %identity.subject_name,
                correlation_id = %identity.correlation_id,
                "Resolved caller identity"
            );
            parts.extensions.insert(identity);
            next.run(Request::from_parts(parts, body)).await
        }
        Err(e) => {
            tracing::warn!(
                error = %e,
                error_code = e.error_code(),
                path = %parts.uri.path(),
                "Identity resolution failed"
            );
            e.into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{Identity, JwtConfig, JwtProvider, ProviderChain, UserProfile};
    use crate::auth::keys::KeySeed;
    use axum::{
        body::Body,
        http::{self, StatusCode},
        routing::get,
        Extension, Router,
    };
    use std::time::Duration;
    use tower::ServiceExt;

    fn state() -> AppState {
        let jwt = JwtProvider::new(&JwtConfig {
            key_id: "1".to_string(),
            keys: vec![KeySeed {
                id: "1".to_string(),
                seed: "seed-one".to_string(),
            }],
            ..Default::default()
        });
        AppState::new(ProviderChain::new().with_jwt(jwt))
    }

    fn app(state: AppState) -> Router {
        Router::new()
            .route(
                "/echo",
                get(|Extension(identity): Extension<Identity>| async move {
                    format!("{}:{}", identity.role, identity.subject_name)
                }),
            )
            .route_layer(axum::middleware::from_fn_with_state(
                state.clone(),
                resolve_identity,
            ))
            .with_state(state)
    }

    #[tokio::test]
    async fn anonymous_request_reaches_handler_as_guest() {
        let response = app(state())
            .oneshot(http::Request::builder().uri("/echo").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"guest:");
    }

    #[tokio::test]
    async fn bad_token_is_rejected_before_handler() {
        let response = app(state())
            .oneshot(
                http::Request::builder()
                    .uri("/echo")
                    .header("Authorization", "Bearer not-a-jwt")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["error_code"], "malformed_token");
    }

    #[tokio::test]
    async fn valid_token_attaches_identity() {
        let state = state();
        let profile = UserProfile {
            email: "denis@ekspand.com".to_string(),
            ..Default::default()
        };
        let auth = state
            .chain
            .jwt()
            .unwrap()
            .sign(&profile, "device123", Duration::from_secs(60))
            .unwrap();

        let response = app(state)
            .oneshot(
                http::Request::builder()
                    .uri("/echo")
                    .header("Authorization", format!("Bearer {}", auth.access_token))
                    .header("X-Device-ID", "device123")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"guest:denis@ekspand.com");
    }
}
