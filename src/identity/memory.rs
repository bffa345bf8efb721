// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! In-memory identity directory.
//!
//! Used for tests and for dev seeding at startup. Not persistent.

use std::collections::HashMap;
use std::sync::RwLock;

use chrono::Utc;

use super::{IdentityLookup, IdentityRecord, LookupError};

/// HashMap-backed directory keyed by username.
#[derive(Default)]
pub struct InMemoryDirectory {
    records: RwLock<HashMap<String, IdentityRecord>>,
}

impl InMemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a record.
    pub fn insert(&self, record: IdentityRecord) {
        if let Ok(mut records) = self.records.write() {
            records.insert(record.username.clone(), record);
        }
    }

    /// Convenience seeding: create a record with the given authorities
    /// and a placeholder credential hash.
    pub fn seed(&self, username: impl Into<String>, authorities: Vec<String>) -> IdentityRecord {
        let record = IdentityRecord {
            username: username.into(),
            credential_hash: String::new(),
            authorities,
            created_at: Utc::now(),
        };
        self.insert(record.clone());
        record
    }
}

impl IdentityLookup for InMemoryDirectory {
    fn by_identity(&self, identity: &str) -> Result<Option<IdentityRecord>, LookupError> {
        let records = self
            .records
            .read()
            .map_err(|_| LookupError::new("directory lock poisoned"))?;
        Ok(records.get(identity).cloned())
    }
}
