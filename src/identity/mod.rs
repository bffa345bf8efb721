// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Identity Directory
//!
//! The gate resolves token subjects against an identity directory behind
//! the [`IdentityLookup`] trait. The trait is the abstraction boundary:
//! the authenticator neither knows nor cares which storage engine backs
//! it. Two implementations ship here:
//!
//! - [`FileDirectory`] - one JSON file per identity under a data
//!   directory (the production store)
//! - [`InMemoryDirectory`] - HashMap-backed, for tests and dev seeding
//!
//! Records are read-only from the gate's perspective; the write side
//! exists only for provisioning and tests.

pub mod file;
pub mod memory;
pub mod roles;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use file::FileDirectory;
pub use memory::InMemoryDirectory;
pub use roles::RoleName;

/// A directory entry for one identity.
///
/// `credential_hash` is opaque to the gate - it is carried for the
/// surrounding system's credential flows and never inspected here.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IdentityRecord {
    /// Unique identity string (the token subject)
    pub username: String,

    /// Opaque credential hash (never read by the gate)
    pub credential_hash: String,

    /// Granted authority labels, e.g. `ROLE_USER`
    pub authorities: Vec<String>,

    /// When the record was created
    pub created_at: DateTime<Utc>,
}

/// Opaque lookup failure.
///
/// The gate never interprets this beyond logging it; any lookup failure
/// normalizes to an anonymous request at the authenticator boundary.
#[derive(Debug, thiserror::Error)]
#[error("identity lookup failed: {message}")]
pub struct LookupError {
    message: String,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl LookupError {
    /// Create a lookup error from a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    /// Create a lookup error wrapping an underlying cause.
    pub fn with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

/// Read interface resolving an identity string to its record.
///
/// Implementations must be safe for concurrent invocation from multiple
/// request-handling tasks and may block (e.g. on file I/O). The gate
/// never retries a failed lookup.
pub trait IdentityLookup: Send + Sync {
    /// Resolve an identity. `Ok(None)` means "no such identity" and is
    /// not an error.
    fn by_identity(&self, identity: &str) -> Result<Option<IdentityRecord>, LookupError>;
}
