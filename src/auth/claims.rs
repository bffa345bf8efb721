// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Token claims and the request-scoped principal.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::identity::IdentityRecord;

/// Payload embedded in an issued token.
///
/// `roles` is advisory: it records the authorities the subject held at
/// issue time, but the authenticator always resolves the authoritative
/// set through the identity directory. A token therefore never outlives
/// a revoked or changed directory record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Subject (identity string)
    pub sub: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration (Unix timestamp)
    pub exp: i64,

    /// Authority labels at issue time (advisory)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub roles: Vec<String>,
}

/// The authenticated identity resolved for a single request.
///
/// Constructed fresh per request from the directory record, carried in
/// the request's extension slot, and discarded when the request ends.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct Principal {
    /// Identity string (the token subject)
    pub identity: String,

    /// Granted authority labels, in directory order
    pub authorities: Vec<String>,
}

impl Principal {
    /// Build a principal from a directory record.
    pub fn from_record(record: IdentityRecord) -> Self {
        Self {
            identity: record.username,
            authorities: record.authorities,
        }
    }

    /// Check whether the principal holds the given authority label.
    pub fn has_authority(&self, label: &str) -> bool {
        self.authorities.iter().any(|a| a == label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn sample_record() -> IdentityRecord {
        IdentityRecord {
            username: "alice".to_string(),
            credential_hash: "$argon2id$placeholder".to_string(),
            authorities: vec!["ROLE_USER".to_string(), "ROLE_MODERATOR".to_string()],
            created_at: Utc::now(),
        }
    }

    #[test]
    fn from_record_carries_identity_and_authorities() {
        let principal = Principal::from_record(sample_record());
        assert_eq!(principal.identity, "alice");
        assert_eq!(principal.authorities, vec!["ROLE_USER", "ROLE_MODERATOR"]);
    }

    #[test]
    fn has_authority_checks_membership() {
        let principal = Principal::from_record(sample_record());
        assert!(principal.has_authority("ROLE_USER"));
        assert!(principal.has_authority("ROLE_MODERATOR"));
        assert!(!principal.has_authority("ROLE_ADMIN"));
    }

    #[test]
    fn claims_roundtrip_without_roles() {
        let claims = Claims {
            sub: "bob".to_string(),
            iat: 1700000000,
            exp: 1700003600,
            roles: Vec::new(),
        };
        let json = serde_json::to_string(&claims).unwrap();
        // Empty roles are omitted on the wire
        assert!(!json.contains("roles"));
        let back: Claims = serde_json::from_str(&json).unwrap();
        assert_eq!(back, claims);
    }
}
