// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Device-bound JWT identity provider.
//!
//! ## Token Format
//!
//! HS256 JWS compact serialization. The header carries the signing key id
//! (`kid`); the claims carry the user profile under `sfu`, the `DeviceID`
//! the token was issued to, and `iss`, `aud`, `sub`, `iat`, `exp`.
//!
//! ## Verification
//!
//! 1. `Authorization: Bearer <token>`, fields separated by whitespace
//!    (anything else is "no credential")
//! 2. Header: algorithm must be HS256, `kid` (string or integer) must name a
//!    configured key
//! 3. HMAC signature, then `exp`, `iat` and `nbf`
//! 4. Device id, issuer, audience must match, in that order
//! 5. Role is recomputed from configuration, never read from the token

use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

use axum::http::{header::AUTHORIZATION, request::Parts};
use base64ct::{Base64UrlUnpadded, Encoding};
use chrono::Utc;
use hmac::{Hmac, Mac};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::{de::DeserializeOwned, Deserialize};
use sha2::Sha256;

use super::claims::{Authorization, TokenClaims, UserProfile, AUTHORIZATION_VERSION, TOKEN_TYPE_JWT};
use super::identity::{correlation_id, has_bearer_scheme, header_str, BEARER, X_DEVICE_ID};
use super::keys::{KeySeed, KeyStore};
use super::provider::IdentityProvider;
use super::roles::RoleResolver;
use super::{AuthError, Identity};
use crate::config::load_yaml;
use crate::error::ConfigError;

/// Provider name; also the default issuer and audience.
pub const PROVIDER_NAME: &str = "jwt";

/// The only accepted signing algorithm.
const SIGNING_ALGORITHM: Algorithm = Algorithm::HS256;
const SIGNING_ALGORITHM_NAME: &str = "HS256";

type HmacSha256 = Hmac<Sha256>;

/// JWT provider file.
///
/// ```yaml
/// issuer: enrollme
/// audience: enrollme
/// kid: "1"
/// keys:
///   - id: "1"
///     seed: "..."
/// default_role: enrollme-user
/// roles:
///   enrollme-admin:
///     - admin@example.com
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct JwtConfig {
    pub audience: String,
    pub issuer: String,
    /// Id of the key used for signing
    #[serde(rename = "kid")]
    pub key_id: String,
    pub keys: Vec<KeySeed>,
    pub default_role: String,
    /// Role name to subject emails
    pub roles: BTreeMap<String, Vec<String>>,
}

impl JwtConfig {
    /// Load the provider file. An empty path yields an empty configuration.
    ///
    /// # Errors
    ///
    /// Fails when the file cannot be read or parsed, or when `kid` or `keys`
    /// is missing.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if path.as_os_str().is_empty() {
            return Ok(Self::default());
        }

        let config: JwtConfig = load_yaml(path)?;
        if config.key_id.is_empty() {
            return Err(ConfigError::MissingKeyId(path.to_path_buf()));
        }
        if config.keys.is_empty() {
            return Err(ConfigError::MissingKeys(path.to_path_buf()));
        }

        Ok(config)
    }
}

/// Raw JWS header; `kid` is kept untyped so integer ids are accepted.
#[derive(Debug, Deserialize)]
struct RawHeader {
    #[serde(default)]
    alg: String,
    #[serde(default)]
    kid: Option<serde_json::Value>,
}

/// Signs and verifies device-bound identity tokens.
#[derive(Debug, Clone)]
pub struct JwtProvider {
    issuer: String,
    audience: String,
    /// `None` for a provider built from an empty configuration.
    keys: Option<KeyStore>,
    roles: RoleResolver,
}

impl JwtProvider {
    pub fn new(config: &JwtConfig) -> Self {
        let issuer = if config.issuer.is_empty() {
            PROVIDER_NAME.to_string()
        } else {
            config.issuer.clone()
        };
        let audience = if config.audience.is_empty() {
            PROVIDER_NAME.to_string()
        } else {
            config.audience.clone()
        };

        // load only fails on an empty key list
        let keys = KeyStore::load(&config.keys, &config.key_id).ok();
        if keys.is_none() {
            tracing::warn!("JWT provider has no keys; tokens can be neither signed nor verified");
        }

        Self {
            issuer,
            audience,
            keys,
            roles: RoleResolver::new(&config.default_role, &config.roles),
        }
    }

    /// Load the provider file and build the provider.
    ///
    /// # Errors
    ///
    /// See [`JwtConfig::load`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let config = JwtConfig::load(path)?;
        Ok(Self::new(&config))
    }

    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    pub fn audience(&self) -> &str {
        &self.audience
    }

    pub fn key_store(&self) -> Option<&KeyStore> {
        self.keys.as_ref()
    }

    /// Role the provider assigns to `email`.
    pub fn user_role(&self, email: &str) -> &str {
        self.roles.resolve(email)
    }

    /// Issue a token for `profile` bound to `device_id`, valid for `ttl`.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::NoSigningKey`] for a provider without keys, and
    /// [`AuthError::InternalError`] if encoding fails.
    pub fn sign(
        &self,
        profile: &UserProfile,
        device_id: &str,
        ttl: Duration,
    ) -> Result<Authorization, AuthError> {
        let key = self
            .keys
            .as_ref()
            .ok_or(AuthError::NoSigningKey)?
            .current_key();

        let ttl = chrono::Duration::from_std(ttl)
            .map_err(|e| AuthError::InternalError(format!("invalid token lifetime: {e}")))?;
        let issued_at = Utc::now();
        let expires_at = issued_at
            .checked_add_signed(ttl)
            .ok_or_else(|| AuthError::InternalError("token lifetime overflows".to_string()))?;

        let claims = TokenClaims {
            profile: profile.clone(),
            device_id: device_id.to_string(),
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
            sub: profile.email.clone(),
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
            nbf: None,
        };

        let mut header = Header::new(SIGNING_ALGORITHM);
        header.kid = Some(key.id.clone());

        let access_token = encode(&header, &claims, &EncodingKey::from_secret(key.secret()))
            .map_err(|e| AuthError::InternalError(format!("failed to sign token: {e}")))?;

        tracing::debug!(
            kid = %key.id,
            subject = %profile.email,
            device_id = %device_id,
            expires_at = %expires_at,
            "Signed identity token"
        );

        Ok(Authorization {
            version: AUTHORIZATION_VERSION.to_string(),
            device_id: device_id.to_string(),
            user_id: profile.id.clone(),
            email: profile.email.clone(),
            user_name: profile.name.clone(),
            role: self.user_role(&profile.email).to_string(),
            token_type: TOKEN_TYPE_JWT.to_string(),
            access_token,
            expires_at,
        })
    }

    /// Verify `token` as presented from `device_id` and return its claims.
    ///
    /// # Errors
    ///
    /// Returns the first failed check; see the module documentation for the
    /// order.
    pub fn verify_token(&self, token: &str, device_id: &str) -> Result<TokenClaims, AuthError> {
        let claims = self.decode_verified(token)?;

        if claims.device_id != device_id {
            return Err(AuthError::InvalidDeviceId(device_id.to_string()));
        }
        if claims.iss != self.issuer {
            return Err(AuthError::InvalidIssuer(claims.iss));
        }
        if claims.aud != self.audience {
            return Err(AuthError::InvalidAudience(claims.aud));
        }

        Ok(claims)
    }

    /// Signature, key and expiry checks.
    fn decode_verified(&self, token: &str) -> Result<TokenClaims, AuthError> {
        let mut segments = token.split('.');
        let (Some(header_b64), Some(claims_b64), Some(signature_b64), None) = (
            segments.next(),
            segments.next(),
            segments.next(),
            segments.next(),
        ) else {
            return Err(AuthError::MalformedToken);
        };

        let header: RawHeader = decode_segment(header_b64)?;
        if header.alg != SIGNING_ALGORITHM_NAME {
            return Err(AuthError::UnexpectedAlgorithm(header.alg));
        }

        let kid = match header.kid {
            None | Some(serde_json::Value::Null) => return Err(AuthError::MissingKeyId),
            Some(serde_json::Value::String(kid)) => kid,
            Some(serde_json::Value::Number(kid)) => kid.to_string(),
            Some(_) => return Err(AuthError::UnknownKeyId),
        };

        let key = self
            .keys
            .as_ref()
            .and_then(|keys| keys.lookup(&kid))
            .ok_or(AuthError::UnknownKeyId)?;

        let signature =
            Base64UrlUnpadded::decode_vec(signature_b64).map_err(|_| AuthError::InvalidSignature)?;
        let mut mac = HmacSha256::new_from_slice(key.secret())
            .map_err(|e| AuthError::InternalError(e.to_string()))?;
        mac.update(header_b64.as_bytes());
        mac.update(b".");
        mac.update(claims_b64.as_bytes());
        mac.verify_slice(&signature)
            .map_err(|_| AuthError::InvalidSignature)?;

        let claims: TokenClaims = decode_segment(claims_b64)?;
        let now = Utc::now().timestamp();
        if now > claims.exp {
            return Err(AuthError::TokenExpired);
        }
        if claims.iat > now || claims.nbf.is_some_and(|nbf| now < nbf) {
            return Err(AuthError::TokenNotYetValid);
        }

        Ok(claims)
    }
}

fn decode_segment<T: DeserializeOwned>(segment: &str) -> Result<T, AuthError> {
    let bytes = Base64UrlUnpadded::decode_vec(segment).map_err(|_| AuthError::MalformedToken)?;
    serde_json::from_slice(&bytes).map_err(|_| AuthError::MalformedToken)
}

/// Token from `Authorization: Bearer <token>`; exactly two parts.
fn bearer_token(parts: &Parts) -> Option<&str> {
    let mut fields = header_str(parts, AUTHORIZATION).split_whitespace();
    match (fields.next(), fields.next(), fields.next()) {
        (Some(BEARER), Some(token), None) => Some(token),
        _ => None,
    }
}

impl IdentityProvider for JwtProvider {
    fn name(&self) -> &'static str {
        PROVIDER_NAME
    }

    fn applicable(&self, parts: &Parts) -> bool {
        has_bearer_scheme(header_str(parts, AUTHORIZATION))
    }

    fn verify(&self, parts: &Parts) -> Result<Option<Identity>, AuthError> {
        let Some(token) = bearer_token(parts) else {
            return Ok(None);
        };
        let device_id = header_str(parts, X_DEVICE_ID);

        let claims = self.verify_token(token, device_id).inspect_err(|e| {
            tracing::debug!(error = %e, device_id = %device_id, "Bearer token rejected");
        })?;

        let role = self.user_role(&claims.profile.email).to_string();
        let identity = Identity::new(role, claims.profile.email.clone(), correlation_id(parts))
            .with_user_profile(claims.profile);

        Ok(Some(identity))
    }
}
