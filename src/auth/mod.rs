// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Identity Resolution
//!
//! Resolves one caller identity per request and mints device-bound tokens.
//!
//! ## Resolution Flow
//!
//! 1. The HTTP boundary (`middleware`) hands request parts to the
//!    [`ProviderChain`]
//! 2. The chain asks each configured provider, in order JWT, API key, client
//!    certificate, whether the request carries its credential
//! 3. The first provider that claims the request verifies it; its result is
//!    final
//! 4. Requests nobody claims resolve to the guest identity
//!
//! ## Security
//!
//! - Tokens are HS256 only; other algorithms are rejected before key lookup
//! - Verification keys are selected by the token `kid`, never by "current"
//! - Tokens are bound to the `X-Device-ID` they were issued for
//! - Roles always come from provider configuration, never from token claims

pub mod api_key;
pub mod cert;
pub mod chain;
pub mod claims;
pub mod error;
pub mod extractor;
pub mod guest;
pub mod identity;
pub mod jwt;
pub mod keys;
pub mod middleware;
pub mod provider;
pub mod roles;

pub use chain::ProviderChain;
pub use claims::{Authorization, UserProfile};
pub use error::AuthError;
pub use extractor::Caller;
pub use identity::Identity;
pub use jwt::{JwtConfig, JwtProvider};
pub use provider::IdentityProvider;
pub use roles::GUEST_ROLE;
