// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Resolved caller identity and the request headers it is built from.

use std::net::SocketAddr;

use axum::{extract::ConnectInfo, http::request::Parts};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::claims::UserProfile;

/// Scheme marker of bearer credentials in the `Authorization` header.
pub const BEARER: &str = "Bearer";

/// Header carrying the caller's device identifier.
pub const X_DEVICE_ID: &str = "x-device-id";

/// Header carrying a caller-supplied correlation id.
pub const X_CORRELATION_ID: &str = "x-correlation-id";

/// Header set by the request-id layer.
pub const X_REQUEST_ID: &str = "x-request-id";

const X_FORWARDED_FOR: &str = "x-forwarded-for";
const X_REAL_IP: &str = "x-real-ip";

/// Caller identity produced once per request by the provider chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Identity {
    /// Role used by downstream authorization
    pub role: String,

    /// Subject name (email, API-key id, certificate CN, or client address)
    pub subject_name: String,

    /// Correlation id for logs and audit
    pub correlation_id: String,

    /// Profile embedded in the bearer token, if the caller presented one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_profile: Option<UserProfile>,
}

impl Identity {
    pub fn new(
        role: impl Into<String>,
        subject_name: impl Into<String>,
        correlation_id: impl Into<String>,
    ) -> Self {
        Self {
            role: role.into(),
            subject_name: subject_name.into(),
            correlation_id: correlation_id.into(),
            user_profile: None,
        }
    }

    pub fn with_user_profile(mut self, profile: UserProfile) -> Self {
        self.user_profile = Some(profile);
        self
    }
}

/// Header value as a string; missing or non-UTF-8 values read as empty.
pub(crate) fn header_str<'a>(parts: &'a Parts, name: impl axum::http::header::AsHeaderName) -> &'a str {
    parts
        .headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
}

/// Whether an `Authorization` value uses the bearer scheme: the exact
/// `Bearer` marker followed by whitespace.
pub(crate) fn has_bearer_scheme(value: &str) -> bool {
    value
        .strip_prefix(BEARER)
        .is_some_and(|rest| rest.starts_with(char::is_whitespace))
}

/// Correlation id for the request: `X-Correlation-ID`, then `X-Request-ID`,
/// then a fresh UUID.
pub fn correlation_id(parts: &Parts) -> String {
    [X_CORRELATION_ID, X_REQUEST_ID]
        .into_iter()
        .map(|name| header_str(parts, name).trim())
        .find(|value| !value.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string())
}

/// Best-effort client address: first `X-Forwarded-For` hop, `X-Real-IP`,
/// then the connection peer.
pub fn client_ip(parts: &Parts) -> String {
    let forwarded = header_str(parts, X_FORWARDED_FOR)
        .split(',')
        .next()
        .unwrap_or_default()
        .trim();
    if !forwarded.is_empty() {
        return forwarded.to_string();
    }

    let real_ip = header_str(parts, X_REAL_IP).trim();
    if !real_ip.is_empty() {
        return real_ip.to_string();
    }

    parts
        .extensions
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts_with(headers: &[(&str, &str)]) -> Parts {
        let mut builder = Request::builder().uri("/test");
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[test]
    fn correlation_id_prefers_explicit_header() {
        let parts = parts_with(&[(X_CORRELATION_ID, "corr-1"), (X_REQUEST_ID, "req-1")]);
        assert_eq!(correlation_id(&parts), "corr-1");
    }

    #[test]
    fn correlation_id_uses_request_id() {
        let parts = parts_with(&[(X_REQUEST_ID, "req-1")]);
        assert_eq!(correlation_id(&parts), "req-1");
    }

    #[test]
    fn correlation_id_is_generated_when_absent() {
        let parts = parts_with(&[]);
        let id = correlation_id(&parts);
        assert!(uuid::Uuid::parse_str(&id).is_ok());
    }

    #[test]
    fn client_ip_takes_first_forwarded_hop() {
        let parts = parts_with(&[(X_FORWARDED_FOR, "10.0.0.1, 10.0.0.2")]);
        assert_eq!(client_ip(&parts), "10.0.0.1");
    }

    #[test]
    fn client_ip_falls_back_to_connect_info() {
        let mut parts = parts_with(&[]);
        parts
            .extensions
            .insert(ConnectInfo::<SocketAddr>("192.168.1.7:5555".parse().unwrap()));
        assert_eq!(client_ip(&parts), "192.168.1.7");
    }

    #[test]
    fn client_ip_is_empty_without_hints() {
        assert_eq!(client_ip(&parts_with(&[])), "");
    }
}
