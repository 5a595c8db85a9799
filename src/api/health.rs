// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{extract::State, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::state::AppState;

/// Health check response with identity provider status.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Overall status ("ok" or "degraded").
    pub status: String,
    /// Configured credential providers in precedence order.
    pub providers: Vec<String>,
    /// JWT key set status, when the JWT provider is configured:
    /// "ok", "missing" (no keys), or "inconsistent" (current kid not in the key set).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jwt_keys: Option<String>,
}

fn check_jwt_keys(state: &AppState) -> Option<&'static str> {
    let jwt = state.chain.jwt()?;
    Some(match jwt.key_store() {
        None => "missing",
        Some(keys) if !keys.current_kid_configured() => "inconsistent",
        Some(_) => "ok",
    })
}

/// Health check endpoint handler.
#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, description = "Service is running", body = HealthResponse),
    )
)]
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let jwt_keys = check_jwt_keys(&state);
    let status = match jwt_keys {
        Some("ok") | None => "ok",
        Some(_) => "degraded",
    };

    Json(HealthResponse {
        status: status.to_string(),
        providers: state
            .chain
            .provider_names()
            .into_iter()
            .map(str::to_string)
            .collect(),
        jwt_keys: jwt_keys.map(str::to_string),
    })
}
