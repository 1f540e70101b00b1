// This file is part of the product Groceries.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use super::{BootstrapError, log_action};
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::Path;

const DEFAULT_PORT: u16 = 8000;
const DEFAULT_WORKERS: u16 = 2;
const DEFAULT_SEARCH_URL: &str = "http://127.0.0.1:7700";

/// Writes the commented default `config.yaml` into `root` unless one exists.
/// Returns whether a file was written.
pub fn ensure_config(root: &Path) -> Result<bool, BootstrapError> {
    let path = root.join("config.yaml");
    let write_failed = |source| BootstrapError::WriteConfig {
        path: path.clone(),
        source,
    };

    let mut file = match OpenOptions::new().write(true).create_new(true).open(&path) {
        Ok(file) => file,
        Err(err) if err.kind() == io::ErrorKind::AlreadyExists => return Ok(false),
        Err(err) => return Err(write_failed(err)),
    };
    file.write_all(default_config_yaml().as_bytes())
        .and_then(|()| file.sync_all())
        .map_err(write_failed)?;

    log_action(format!(
        "created config.yaml (port {}, search engine at {})",
        DEFAULT_PORT, DEFAULT_SEARCH_URL
    ));
    Ok(true)
}

fn default_config_yaml() -> String {
    format!(
        "server:\n  host: \"0.0.0.0\"\n  port: {port}\n  workers: {workers}\n\nlogging:\n  level: \"info\"\n\n# The API key usually comes from MEILI_KEY; MEILI_URL overrides url.\nsearch:\n  engine: \"meilisearch\"\n  url: \"{url}\"\n  api_key: null\n  timeout_seconds: 10\n  startup:\n    max_attempts: 10\n    initial_backoff_ms: 500\n    max_backoff_ms: 5000\n\nfrontend:\n  dir: \"static\"\n\ndev_mode: false\n",
        port = DEFAULT_PORT,
        workers = DEFAULT_WORKERS,
        url = DEFAULT_SEARCH_URL,
    )
}
