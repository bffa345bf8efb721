// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! File-backed identity directory.
//!
//! One JSON file per identity under `{root}/identities/`. Writes go
//! through a temp file and rename so a crashed write never leaves a
//! half-written record. The backing directory is expected to be private
//! to the service; this module does no encryption of its own.

use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use super::{IdentityLookup, IdentityRecord, LookupError};

/// Error type for directory storage operations.
#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    /// I/O error during file operations
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    /// Directory not initialized
    #[error("identity directory not initialized")]
    NotInitialized,
    /// Username is not a safe file stem
    #[error("invalid username: {0:?}")]
    InvalidUsername(String),
}

/// Result type for directory storage operations.
pub type DirectoryResult<T> = Result<T, DirectoryError>;

/// Usernames double as file stems; restrict them to a safe alphabet.
fn is_safe_username(username: &str) -> bool {
    !username.is_empty()
        && username.len() <= 128
        && username
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-' | '@'))
        && !username.starts_with('.')
}

/// Identity directory storing one JSON record per identity.
#[derive(Debug, Clone)]
pub struct FileDirectory {
    root: PathBuf,
    initialized: bool,
}

impl FileDirectory {
    /// Create a directory rooted at `root`.
    ///
    /// Does NOT create the on-disk layout. Call `initialize()` first.
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            initialized: false,
        }
    }

    /// Root directory for all identity data.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn identities_dir(&self) -> PathBuf {
        self.root.join("identities")
    }

    fn record_path(&self, username: &str) -> PathBuf {
        self.identities_dir().join(format!("{username}.json"))
    }

    /// Create the on-disk layout. Safe to call multiple times.
    pub fn initialize(&mut self) -> DirectoryResult<()> {
        fs::create_dir_all(self.identities_dir())?;
        self.initialized = true;
        Ok(())
    }

    /// Insert or replace a record (atomic write via rename).
    pub fn put(&self, record: &IdentityRecord) -> DirectoryResult<()> {
        if !self.initialized {
            return Err(DirectoryError::NotInitialized);
        }
        if !is_safe_username(&record.username) {
            return Err(DirectoryError::InvalidUsername(record.username.clone()));
        }

        let path = self.record_path(&record.username);
        let temp_path = path.with_extension("tmp");
        {
            let file = File::create(&temp_path)?;
            let mut writer = BufWriter::new(file);
            serde_json::to_writer_pretty(&mut writer, record)?;
            writer.flush()?;
        }
        fs::rename(&temp_path, path)?;
        Ok(())
    }

    /// Get a record by username. `Ok(None)` when no record exists.
    pub fn get(&self, username: &str) -> DirectoryResult<Option<IdentityRecord>> {
        if !self.initialized {
            return Err(DirectoryError::NotInitialized);
        }
        if !is_safe_username(username) {
            // An unsafe name can never have been stored
            return Ok(None);
        }

        let path = self.record_path(username);
        let file = match File::open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let reader = BufReader::new(file);
        let record = serde_json::from_reader(reader)?;
        Ok(Some(record))
    }

    /// List all stored usernames.
    pub fn list(&self) -> DirectoryResult<Vec<String>> {
        if !self.initialized {
            return Err(DirectoryError::NotInitialized);
        }

        let mut usernames = Vec::new();
        for entry in fs::read_dir(self.identities_dir())? {
            let path = entry?.path();
            if path.is_file() && path.extension().is_some_and(|ext| ext == "json") {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    usernames.push(stem.to_string());
                }
            }
        }
        Ok(usernames)
    }

    /// Delete a record.
    pub fn delete(&self, username: &str) -> DirectoryResult<()> {
        if !self.initialized {
            return Err(DirectoryError::NotInitialized);
        }
        fs::remove_file(self.record_path(username))?;
        Ok(())
    }
}

impl IdentityLookup for FileDirectory {
    fn by_identity(&self, identity: &str) -> Result<Option<IdentityRecord>, LookupError> {
        self.get(identity)
            .map_err(|e| LookupError::with_source("file directory read failed", e))
    }
}
