// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Token claims, the embedded user profile, and the issuance result.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Token format version reported in [`Authorization`].
pub const AUTHORIZATION_VERSION: &str = "v1.0";

/// Token type reported in [`Authorization`].
pub const TOKEN_TYPE_JWT: &str = "jwt";

/// Caller-supplied user attributes carried inside the token.
///
/// The token layer treats this as an opaque payload: it is embedded verbatim
/// under the `sfu` claim and handed back unchanged on verification. Field
/// names are a wire contract shared with other services.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct UserProfile {
    #[serde(rename = "user_id")]
    pub id: String,
    #[serde(rename = "organization_id")]
    pub org_id: String,
    #[serde(rename = "preferred_username")]
    pub preferred_user_name: String,
    pub name: String,
    pub email: String,
    pub email_verified: bool,
    #[serde(rename = "profile")]
    pub profile_url: String,
    #[serde(rename = "picture")]
    pub picture_url: String,
    #[serde(rename = "phone_number")]
    pub phone: String,
    #[serde(rename = "phone_number_verified")]
    pub phone_verified: bool,
    pub active: bool,
    pub user_type: String,
    #[serde(rename = "zoneinfo")]
    pub time_zone: String,
    #[serde(rename = "utcOffset")]
    pub utc_offset: i64,
}

/// Claim set of a device-bound identity token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Embedded user profile
    #[serde(rename = "sfu")]
    pub profile: UserProfile,

    /// Device the token was issued to
    #[serde(rename = "DeviceID", default)]
    pub device_id: String,

    /// Issuer
    #[serde(default)]
    pub iss: String,

    /// Audience
    #[serde(default)]
    pub aud: String,

    /// Subject (profile email)
    #[serde(default)]
    pub sub: String,

    /// Issued at timestamp
    #[serde(default)]
    pub iat: i64,

    /// Expiration timestamp
    pub exp: i64,

    /// Not-before timestamp, when the issuer set one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nbf: Option<i64>,
}

/// Returned to the caller of [`super::JwtProvider::sign`].
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Authorization {
    pub version: String,
    pub device_id: String,
    pub user_id: String,
    pub email: String,
    pub user_name: String,
    pub role: String,
    pub token_type: String,
    pub access_token: String,
    pub expires_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_uses_wire_field_names() {
        let profile = UserProfile {
            id: "123".into(),
            org_id: "456".into(),
            preferred_user_name: "denis".into(),
            email: "denis@example.com".into(),
            phone_verified: true,
            utc_offset: -7,
            ..Default::default()
        };
        let value = serde_json::to_value(&profile).unwrap();
        assert_eq!(value["user_id"], "123");
        assert_eq!(value["organization_id"], "456");
        assert_eq!(value["phone_number_verified"], true);
        assert_eq!(value["preferred_username"], "denis");
        assert_eq!(value["utcOffset"], -7);
        assert!(value.get("zoneinfo").is_some());
    }

    #[test]
    fn claims_embed_profile_under_sfu() {
        let claims = TokenClaims {
            profile: UserProfile {
                email: "a@example.com".into(),
                ..Default::default()
            },
            device_id: "device123".into(),
            iss: "jwt".into(),
            aud: "jwt".into(),
            sub: "a@example.com".into(),
            iat: 1_700_000_000,
            exp: 1_700_000_060,
            nbf: None,
        };
        let value = serde_json::to_value(&claims).unwrap();
        assert_eq!(value["sfu"]["email"], "a@example.com");
        assert_eq!(value["DeviceID"], "device123");
        assert_eq!(value["exp"], 1_700_000_060);
        assert!(value.get("nbf").is_none());
    }

    #[test]
    fn partial_profile_decodes_with_defaults() {
        let profile: UserProfile =
            serde_json::from_str(r#"{"email":"x@example.com","active":true}"#).unwrap();
        assert_eq!(profile.email, "x@example.com");
        assert!(profile.active);
        assert!(profile.id.is_empty());
    }

    #[test]
    fn utc_offset_accepts_values_beyond_32_bits() {
        let profile: UserProfile =
            serde_json::from_str(r#"{"utcOffset":4294967296,"preferred_username":"alice"}"#).unwrap();
        assert_eq!(profile.utc_offset, 4_294_967_296);
        assert_eq!(profile.preferred_user_name, "alice");
    }
}
