// This file is part of the product Groceries.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use crate::config::{ConfigError, ValidatedConfig};
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

pub const SNAPSHOT_FILE_NAME: &str = "db.json";

#[derive(Debug, Clone)]
pub struct RuntimePaths {
    pub root: PathBuf,
    pub config_file: PathBuf,
    pub data_dir: PathBuf,
    pub db_file: PathBuf,
    /// Bundled web client. May not exist; it is only served when present.
    pub static_dir: PathBuf,
}

impl RuntimePaths {
    /// Resolves every path below `root`, creating the root and `data/` when
    /// missing. Fails unless `data/` accepts new files.
    pub fn from_root(root: &Path, config: &ValidatedConfig) -> Result<Self, ConfigError> {
        let root = if root.as_os_str().is_empty() {
            Path::new(".")
        } else {
            root
        };
        fs::create_dir_all(root).map_err(|e| path_error("create runtime root", root, e))?;
        let root = root
            .canonicalize()
            .map_err(|e| path_error("resolve runtime root", root, e))?;

        let data_dir = root.join("data");
        fs::create_dir_all(&data_dir).map_err(|e| path_error("create data directory", &data_dir, e))?;
        probe_writable(&data_dir)?;

        Ok(Self {
            config_file: root.join("config.yaml"),
            db_file: data_dir.join(SNAPSHOT_FILE_NAME),
            static_dir: root.join(&config.frontend.dir),
            data_dir,
            root,
        })
    }
}

fn path_error(action: &str, path: &Path, err: std::io::Error) -> ConfigError {
    ConfigError::ValidationError(format!("Failed to {} '{}': {}", action, path.display(), err))
}

/// Creates and removes a uniquely named file in `dir`.
fn probe_writable(dir: &Path) -> Result<(), ConfigError> {
    let probe = dir.join(format!(".groceries-write-check-{}", Uuid::new_v4()));
    fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&probe)
        .map_err(|e| path_error("write to data directory", dir, e))?;
    fs::remove_file(&probe).map_err(|e| path_error("remove write probe", &probe, e))
}
