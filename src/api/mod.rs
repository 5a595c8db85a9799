// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{middleware, routing::get, Json, Router};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

use crate::{
    auth::{middleware::resolve_identity, Identity, UserProfile},
    state::AppState,
};

pub mod health;
pub mod users;

pub fn router(state: AppState) -> Router {
    let v1_routes = Router::new()
        .route("/whoami", get(users::whoami))
        .route_layer(middleware::from_fn_with_state(state.clone(), resolve_identity))
        .with_state(state.clone());

    Router::new()
        .route("/health", get(health::health))
        .route("/api-doc/openapi.json", get(openapi_json))
        .with_state(state)
        .nest("/v1", v1_routes)
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

#[derive(OpenApi)]
#[openapi(
    paths(health::health, users::whoami),
    components(schemas(Identity, UserProfile, health::HealthResponse)),
    tags(
        (name = "Health", description = "Liveness and provider status"),
        (name = "Identity", description = "Caller identity resolution")
    )
)]
struct ApiDoc;
