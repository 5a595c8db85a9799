// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Identity resolution errors.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Verification-time failure of a credential provider.
///
/// Absence of a credential is not an error: providers return `Ok(None)` for
/// that case and the chain falls back to the guest identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Authorization header belongs to a scheme but is not well formed
    InvalidAuthHeader,
    /// Token is not a three-segment JWS or its claims do not decode
    MalformedToken,
    /// Token header names an algorithm other than HS256
    UnexpectedAlgorithm(String),
    /// Token header carries no `kid`
    MissingKeyId,
    /// Token header `kid` is not in the key store
    UnknownKeyId,
    /// HMAC signature does not match
    InvalidSignature,
    /// Token `exp` is in the past
    TokenExpired,
    /// Token `iat` or `nbf` is in the future
    TokenNotYetValid,
    /// Device header differs from the device bound into the token
    InvalidDeviceId(String),
    /// Token issuer differs from the configured issuer
    InvalidIssuer(String),
    /// Token audience differs from the configured audience
    InvalidAudience(String),
    /// API key is not registered
    InvalidApiKey,
    /// Client certificate cannot be mapped to an identity
    InvalidCertificate(String),
    /// Provider was built from an empty configuration and holds no keys
    NoSigningKey,
    /// Internal error
    InternalError(String),
}

#[derive(Serialize)]
struct AuthErrorBody {
    error: String,
    error_code: String,
}

impl AuthError {
    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::InvalidAuthHeader => "invalid_auth_header",
            AuthError::MalformedToken => "malformed_token",
            AuthError::UnexpectedAlgorithm(_) => "unexpected_algorithm",
            AuthError::MissingKeyId => "missing_kid",
            AuthError::UnknownKeyId => "unknown_kid",
            AuthError::InvalidSignature => "invalid_signature",
            AuthError::TokenExpired => "token_expired",
            AuthError::TokenNotYetValid => "token_not_yet_valid",
            AuthError::InvalidDeviceId(_) => "invalid_device_id",
            AuthError::InvalidIssuer(_) => "invalid_issuer",
            AuthError::InvalidAudience(_) => "invalid_audience",
            AuthError::InvalidApiKey => "invalid_api_key",
            AuthError::InvalidCertificate(_) => "invalid_certificate",
            AuthError::NoSigningKey => "no_signing_key",
            AuthError::InternalError(_) => "internal_error",
        }
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::NoSigningKey | AuthError::InternalError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            _ => StatusCode::UNAUTHORIZED,
        }
    }
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthError::InvalidAuthHeader => {
                write!(f, "Invalid authorization header format (expected 'Bearer <token>')")
            }
            AuthError::MalformedToken => write!(f, "failed to verify token: token is malformed"),
            AuthError::UnexpectedAlgorithm(alg) => {
                write!(f, "failed to verify token: unexpected signing method: {alg}")
            }
            AuthError::MissingKeyId => write!(f, "failed to verify token: missing kid"),
            AuthError::UnknownKeyId => write!(f, "failed to verify token: unexpected kid"),
            AuthError::InvalidSignature => write!(f, "failed to verify token: signature is invalid"),
            AuthError::TokenExpired => write!(f, "failed to verify token: token is expired"),
            AuthError::TokenNotYetValid => {
                write!(f, "failed to verify token: token is not valid yet")
            }
            AuthError::InvalidDeviceId(device_id) => write!(f, "invalid deviceID: {device_id}"),
            AuthError::InvalidIssuer(issuer) => write!(f, "invalid issuer: {issuer}"),
            AuthError::InvalidAudience(audience) => write!(f, "invalid audience: {audience}"),
            AuthError::InvalidApiKey => write!(f, "invalid API key"),
            AuthError::InvalidCertificate(reason) => {
                write!(f, "invalid client certificate: {reason}")
            }
            AuthError::NoSigningKey => write!(f, "no signing key configured"),
            AuthError::InternalError(msg) => write!(f, "Internal authentication error: {msg}"),
        }
    }
}

impl std::error::Error for AuthError {}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(AuthErrorBody {
            error: self.to_string(),
            error_code: self.error_code().to_string(),
        });
        (status, body).into_response()
    }
}
