// This file is part of the product Groceries.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use crate::config::{Config, ConfigError, EnvOverrides, ValidatedConfig};
use crate::runtime_paths::RuntimePaths;
use std::error::Error;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub mod config;
pub mod paths;

#[derive(Debug)]
pub struct BootstrapResult {
    pub validated_config: ValidatedConfig,
    pub runtime_paths: RuntimePaths,
    pub created_config: bool,
}

#[derive(Debug)]
pub enum BootstrapError {
    Config(ConfigError),
    RuntimeRoot { path: PathBuf, source: io::Error },
    WriteConfig { path: PathBuf, source: io::Error },
}

impl fmt::Display for BootstrapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BootstrapError::Config(err) => write!(f, "{}", err),
            BootstrapError::RuntimeRoot { path, source } => {
                write!(f, "Runtime root {} is unusable: {}", path.display(), source)
            }
            BootstrapError::WriteConfig { path, source } => {
                write!(f, "Failed to write default config {}: {}", path.display(), source)
            }
        }
    }
}

impl Error for BootstrapError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            BootstrapError::Config(err) => Some(err),
            BootstrapError::RuntimeRoot { source, .. }
            | BootstrapError::WriteConfig { source, .. } => Some(source),
        }
    }
}

impl From<ConfigError> for BootstrapError {
    fn from(err: ConfigError) -> Self {
        BootstrapError::Config(err)
    }
}

/// Prepares a runtime root: writes a default `config.yaml` when missing,
/// validates it with `env` applied and creates the data directory.
pub fn bootstrap_runtime(root: &Path, env: &EnvOverrides) -> Result<BootstrapResult, BootstrapError> {
    let root = prepare_root(root)?;
    let created_config = config::ensure_config(&root)?;
    let validated_config = Config::load_and_validate(&root, env)?;
    let runtime_paths = paths::ensure_paths(&root, &validated_config)?;

    Ok(BootstrapResult {
        validated_config,
        runtime_paths,
        created_config,
    })
}

/// Creates the root directory when it does not exist yet. An empty path
/// means the current directory.
fn prepare_root(root: &Path) -> Result<PathBuf, BootstrapError> {
    let root = if root.as_os_str().is_empty() {
        Path::new(".")
    } else {
        root
    };
    let unusable = |source| BootstrapError::RuntimeRoot {
        path: root.to_path_buf(),
        source,
    };

    match fs::metadata(root) {
        Ok(metadata) if metadata.is_dir() => {}
        Ok(_) => {
            return Err(unusable(io::Error::new(
                io::ErrorKind::InvalidInput,
                "not a directory",
            )));
        }
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            fs::create_dir_all(root).map_err(unusable)?;
            log_action(format!("created runtime root {}", root.display()));
        }
        Err(err) => return Err(unusable(err)),
    }
    Ok(root.to_path_buf())
}

pub(crate) fn log_action(message: impl AsRef<str>) {
    eprintln!("[bootstrap] {}", message.as_ref());
}

pub(crate) fn log_warning(message: impl AsRef<str>) {
    eprintln!("[bootstrap] WARNING: {}", message.as_ref());
}
