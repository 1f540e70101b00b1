// This file is part of the product Groceries.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

#![allow(dead_code)]

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use uuid::Uuid;

use super::test_config::test_config;
use crate::runtime_paths::{RuntimePaths, SNAPSHOT_FILE_NAME};

/// Runtime root under `<workspace>/target/test-fixtures/<prefix>-<uuid>`.
/// The directory is deleted again when the fixture drops.
#[derive(Debug)]
pub struct TestFixtureRoot {
    path: PathBuf,
}

impl TestFixtureRoot {
    pub fn new_unique(prefix: &str) -> io::Result<Self> {
        let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
        let workspace = manifest_dir.parent().unwrap_or(manifest_dir);
        let path = workspace
            .join("target")
            .join("test-fixtures")
            .join(format!("{}-{}", prefix, Uuid::new_v4()));
        fs::create_dir_all(&path)?;
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Where the snapshot lands for the default layout.
    pub fn db_file(&self) -> PathBuf {
        self.path.join("data").join(SNAPSHOT_FILE_NAME)
    }

    /// Paths for this root with the default test config.
    pub fn runtime_paths(&self) -> io::Result<RuntimePaths> {
        RuntimePaths::from_root(&self.path, &test_config())
            .map_err(|err| io::Error::other(err.to_string()))
    }
}

impl Drop for TestFixtureRoot {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.path);
    }
}
