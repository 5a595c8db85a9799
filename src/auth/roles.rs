// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Subject to role mapping.

use std::collections::{BTreeMap, HashMap};

/// Role assigned to anonymous callers, and the default role when a provider
/// configures none.
pub const GUEST_ROLE: &str = "guest";

/// Maps a verified subject to a role string.
///
/// Lookups are exact and case-sensitive. Subjects without an assignment get
/// the default role.
#[derive(Debug, Clone)]
pub struct RoleResolver {
    default_role: String,
    assignments: HashMap<String, String>,
}

impl RoleResolver {
    /// Build a resolver from a `role -> [subject, ...]` map.
    ///
    /// An empty `default_role` falls back to [`GUEST_ROLE`]. When a subject
    /// is listed under more than one role, the role that sorts first wins.
    pub fn new(default_role: &str, roles: &BTreeMap<String, Vec<String>>) -> Self {
        let mut assignments: HashMap<String, String> = HashMap::new();
        for (role, subjects) in roles {
            for subject in subjects {
                match assignments.get(subject) {
                    Some(existing) if existing != role => {
                        tracing::warn!(
                            subject = %subject,
                            kept = %existing,
                            ignored = %role,
                            "Subject assigned to multiple roles"
                        );
                    }
                    Some(_) => {}
                    None => {
                        assignments.insert(subject.clone(), role.clone());
                    }
                }
            }
        }

        let default_role = if default_role.is_empty() {
            GUEST_ROLE.to_string()
        } else {
            default_role.to_string()
        };

        Self {
            default_role,
            assignments,
        }
    }

    /// Role for `subject`, or the default role.
    pub fn resolve(&self, subject: &str) -> &str {
        match self.assignments.get(subject) {
            Some(role) if !role.is_empty() => role,
            _ => &self.default_role,
        }
    }

    pub fn default_role(&self) -> &str {
        &self.default_role
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roles(entries: &[(&str, &[&str])]) -> BTreeMap<String, Vec<String>> {
        entries
            .iter()
            .map(|(role, subjects)| {
                (
                    role.to_string(),
                    subjects.iter().map(|s| s.to_string()).collect(),
                )
            })
            .collect()
    }

    #[test]
    fn mapped_subject_gets_its_role() {
        let resolver = RoleResolver::new(
            "enrollme-user",
            &roles(&[("enrollme-admin", &["denis@example.com", "ops@example.com"])]),
        );
        assert_eq!(resolver.resolve("denis@example.com"), "enrollme-admin");
        assert_eq!(resolver.resolve("ops@example.com"), "enrollme-admin");
    }

    #[test]
    fn unmapped_subject_gets_default_role() {
        let resolver = RoleResolver::new("enrollme-user", &roles(&[("admin", &["a@example.com"])]));
        assert_eq!(resolver.resolve("b@example.com"), "enrollme-user");
    }

    #[test]
    fn lookup_is_case_sensitive() {
        let resolver = RoleResolver::new("user", &roles(&[("admin", &["a@example.com"])]));
        assert_eq!(resolver.resolve("A@example.com"), "user");
    }

    #[test]
    fn empty_default_falls_back_to_guest() {
        let resolver = RoleResolver::new("", &BTreeMap::new());
        assert_eq!(resolver.default_role(), GUEST_ROLE);
        assert_eq!(resolver.resolve("anyone"), GUEST_ROLE);
    }

    #[test]
    fn first_sorted_role_wins_on_conflict() {
        let resolver = RoleResolver::new(
            "user",
            &roles(&[("auditor", &["a@example.com"]), ("admin", &["a@example.com"])]),
        );
        assert_eq!(resolver.resolve("a@example.com"), "admin");
    }

    #[test]
    fn empty_role_name_falls_back_to_default() {
        let resolver = RoleResolver::new("user", &roles(&[("", &["a@example.com"])]));
        assert_eq!(resolver.resolve("a@example.com"), "user");
    }
}
