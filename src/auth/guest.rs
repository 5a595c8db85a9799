// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Anonymous identity used when no credential scheme claims a request.

use axum::http::request::Parts;

use super::identity::{client_ip, correlation_id};
use super::roles::GUEST_ROLE;
use super::Identity;

/// Guest identity for `parts`. Always succeeds.
pub fn guest_identity(parts: &Parts) -> Identity {
    Identity::new(GUEST_ROLE, client_ip(parts), correlation_id(parts))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    #[test]
    fn guest_has_no_profile() {
        let parts = Request::builder()
            .header("X-Forwarded-For", "203.0.113.9")
            .body(())
            .unwrap()
            .into_parts()
            .0;
        let identity = guest_identity(&parts);
        assert_eq!(identity.role, GUEST_ROLE);
        assert_eq!(identity.subject_name, "203.0.113.9");
        assert!(identity.user_profile.is_none());
    }
}
