// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Role catalog.
//!
//! The directory stores authorities as free-form labels; this enum names
//! the labels the service itself provisions and checks.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Well-known authority labels.
///
/// ## Role Hierarchy
///
/// - `Admin` - full access, including the admin surface
/// - `Moderator` - content moderation privileges
/// - `User` - baseline authenticated access
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum RoleName {
    /// Full administrative access
    Admin,
    /// Content moderation privileges
    Moderator,
    /// Baseline authenticated user
    User,
}

impl RoleName {
    /// The authority label stored in directory records and tokens.
    pub fn label(&self) -> &'static str {
        match self {
            RoleName::Admin => "ROLE_ADMIN",
            RoleName::Moderator => "ROLE_MODERATOR",
            RoleName::User => "ROLE_USER",
        }
    }

    /// Parse a role from its authority label (case-insensitive).
    pub fn from_label(label: &str) -> Option<RoleName> {
        match label.to_uppercase().as_str() {
            "ROLE_ADMIN" => Some(RoleName::Admin),
            "ROLE_MODERATOR" => Some(RoleName::Moderator),
            "ROLE_USER" => Some(RoleName::User),
            _ => None,
        }
    }
}

impl std::fmt::Display for RoleName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_roundtrip() {
        for role in [RoleName::Admin, RoleName::Moderator, RoleName::User] {
            assert_eq!(RoleName::from_label(role.label()), Some(role));
        }
    }

    #[test]
    fn from_label_is_case_insensitive() {
        assert_eq!(RoleName::from_label("role_user"), Some(RoleName::User));
        assert_eq!(RoleName::from_label("Role_Admin"), Some(RoleName::Admin));
    }

    #[test]
    fn from_label_rejects_unknown() {
        assert_eq!(RoleName::from_label("ROLE_SUPERUSER"), None);
        assert_eq!(RoleName::from_label(""), None);
    }

    #[test]
    fn display_matches_label() {
        assert_eq!(RoleName::Admin.to_string(), "ROLE_ADMIN");
    }
}
