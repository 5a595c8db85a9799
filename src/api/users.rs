// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Caller identity endpoint.

use axum::Json;

use crate::auth::{Caller, Identity};

/// Get the identity resolved for the current request.
///
/// Anonymous callers receive the guest identity.
#[utoipa::path(
    get,
    path = "/v1/whoami",
    tag = "Identity",
    params(
        ("X-Device-ID" = Option<String>, Header, description = "Device the bearer token was issued to"),
    ),
    responses(
        (status = 200, description = "Resolved caller identity", body = Identity),
        (status = 401, description = "Credential present but rejected"),
    )
)]
pub async fn whoami(Caller(identity): Caller) -> Json<Identity> {
    Json(identity)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn returns_identity_unchanged() {
        let identity = Identity::new("guest", "203.0.113.9", "corr-1");
        let Json(body) = whoami(Caller(identity.clone())).await;
        assert_eq!(body, identity);
    }
}
