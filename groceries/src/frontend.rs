// This file is part of the product Groceries.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use actix_files::Files;
use actix_web::web;
use std::path::{Path, PathBuf};

use crate::config::ValidatedConfig;
use crate::runtime_paths::RuntimePaths;

/// Directory to serve at `/`, if any. Development mode runs the web client
/// from its own dev server, so nothing is served then.
pub fn frontend_dir(config: &ValidatedConfig, paths: &RuntimePaths) -> Option<PathBuf> {
    if !config.serves_frontend() || !paths.static_dir.is_dir() {
        return None;
    }
    Some(paths.static_dir.clone())
}

/// Mounts the bundled client. Register after `/api` so API routes win.
pub fn configure(cfg: &mut web::ServiceConfig, dir: Option<&Path>) {
    if let Some(dir) = dir {
        cfg.service(Files::new("/", dir).index_file("index.html"));
    }
}
