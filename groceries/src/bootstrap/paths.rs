// This file is part of the product Groceries.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use super::{BootstrapError, log_action, log_warning};
use crate::config::ValidatedConfig;
use crate::runtime_paths::RuntimePaths;
use std::path::Path;

/// Resolves the runtime paths of an existing root, reporting what had to be
/// created and what is missing.
pub fn ensure_paths(root: &Path, config: &ValidatedConfig) -> Result<RuntimePaths, BootstrapError> {
    let data_dir_existed = root.join("data").is_dir();
    let runtime_paths = RuntimePaths::from_root(root, config)?;

    if !data_dir_existed {
        log_action(format!(
            "created data directory {}",
            runtime_paths.data_dir.display()
        ));
    }

    if config.serves_frontend() && !runtime_paths.static_dir.is_dir() {
        log_warning(format!(
            "frontend directory {} not found; only /api will be served",
            runtime_paths.static_dir.display()
        ));
    }

    Ok(runtime_paths)
}
