// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Relational Identity - Request Identity Resolution
//!
//! Resolves exactly one caller identity per inbound request and issues
//! device-bound HS256 bearer tokens.
//!
//! ## Modules
//!
//! - `api` - HTTP routes (Axum)
//! - `auth` - Token issuance/verification and the credential provider chain
//! - `config` - Environment settings and provider file loading
//! - `error` - Configuration errors

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod state;
