// This file is part of the product Groceries.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use super::database::{CURRENT_SCHEMA_VERSION, Database};
use crate::util::atomic_file::write_file_atomic;
use std::fmt;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SnapshotError {
    Io(String),
    Parse(String),
    UnsupportedVersion { found: u32, supported: u32 },
}

impl fmt::Display for SnapshotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SnapshotError::Io(msg) => write!(f, "Snapshot I/O error: {}", msg),
            SnapshotError::Parse(msg) => write!(f, "Snapshot parse error: {}", msg),
            SnapshotError::UnsupportedVersion { found, supported } => write!(
                f,
                "Snapshot schema version {} is newer than supported version {}",
                found, supported
            ),
        }
    }
}

impl std::error::Error for SnapshotError {}

/// Durable home of the [`Database`]. Every save replaces the whole snapshot.
pub trait SnapshotStore: Send + Sync {
    /// Returns `None` when no snapshot has been written yet.
    fn load(&self) -> Result<Option<Database>, SnapshotError>;
    fn save(&self, db: &Database) -> Result<(), SnapshotError>;
}

pub struct FileSnapshotStore {
    path: PathBuf,
}

impl FileSnapshotStore {
    pub fn new(path: PathBuf) -> Result<Self, SnapshotError> {
        if path.as_os_str().is_empty() {
            return Err(SnapshotError::Io("Snapshot path is empty".to_string()));
        }
        Ok(Self { path })
    }

    fn ensure_parent_dir(&self) -> Result<(), SnapshotError> {
        let Some(parent) = self.path.parent() else {
            return Ok(());
        };
        if parent.as_os_str().is_empty() || parent.is_dir() {
            return Ok(());
        }
        std::fs::create_dir_all(parent).map_err(|err| {
            SnapshotError::Io(format!(
                "Failed to create snapshot directory '{}': {}",
                parent.display(),
                err
            ))
        })
    }
}

impl SnapshotStore for FileSnapshotStore {
    fn load(&self) -> Result<Option<Database>, SnapshotError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(&self.path).map_err(|err| {
            SnapshotError::Io(format!(
                "Failed to read snapshot '{}': {}",
                self.path.display(),
                err
            ))
        })?;
        let decoded: Database = serde_json::from_str(&content).map_err(|err| {
            SnapshotError::Parse(format!(
                "Failed to parse snapshot '{}': {}",
                self.path.display(),
                err
            ))
        })?;
        migrate(decoded).map(Some)
    }

    fn save(&self, db: &Database) -> Result<(), SnapshotError> {
        self.ensure_parent_dir()?;
        let content = serde_json::to_vec(db)
            .map_err(|err| SnapshotError::Parse(format!("Failed to serialize snapshot: {}", err)))?;
        write_file_atomic(&self.path, "snapshot", &content)
            .map_err(|err| SnapshotError::Io(err.to_string()))
    }
}

/// Brings a decoded snapshot up to [`CURRENT_SCHEMA_VERSION`].
///
/// Version 0 is the untagged layout of the first releases; it has the same
/// shape as version 1.
pub fn migrate(mut db: Database) -> Result<Database, SnapshotError> {
    if db.version > CURRENT_SCHEMA_VERSION {
        return Err(SnapshotError::UnsupportedVersion {
            found: db.version,
            supported: CURRENT_SCHEMA_VERSION,
        });
    }
    if db.version == 0 {
        log::info!(
            "Migrating snapshot from schema version 0 to {}",
            CURRENT_SCHEMA_VERSION
        );
        db.version = 1;
    }
    Ok(db)
}
