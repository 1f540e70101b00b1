// This file is part of the product Groceries.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use std::fmt;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use uuid::Uuid;

#[derive(Debug)]
pub struct AtomicWriteError {
    message: String,
}

impl AtomicWriteError {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for AtomicWriteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for AtomicWriteError {}

/// Temp file next to its target. Removed on drop unless it was renamed into
/// place.
struct StagedFile {
    path: PathBuf,
    file: fs::File,
    committed: bool,
}

impl StagedFile {
    fn create(dir: &Path, file_name: &str) -> std::io::Result<Self> {
        let path = dir.join(format!(".{}.{}.tmp", file_name, Uuid::new_v4().simple()));
        let file = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)?;
        Ok(Self {
            path,
            file,
            committed: false,
        })
    }

    fn commit(mut self, target: &Path) -> std::io::Result<()> {
        fs::rename(&self.path, target)?;
        self.committed = true;
        Ok(())
    }
}

impl Drop for StagedFile {
    fn drop(&mut self) {
        if !self.committed {
            let _ = fs::remove_file(&self.path);
        }
    }
}

/// Replaces `path` with `content` through a synced temp file in the same
/// directory. On failure `path` is left as it was. `label` names the file in
/// error messages.
pub fn write_file_atomic(path: &Path, label: &str, content: &[u8]) -> Result<(), AtomicWriteError> {
    let fail = |action: &str, err: &dyn fmt::Display| {
        AtomicWriteError::new(format!("Failed to {} {}: {}", action, label, err))
    };

    let (dir, file_name) = match (path.parent(), path.file_name().and_then(|n| n.to_str())) {
        (Some(dir), Some(name)) => (dir, name),
        _ => {
            return Err(AtomicWriteError::new(format!(
                "Invalid {} path: {}",
                label,
                path.display()
            )));
        }
    };

    let mut staged =
        StagedFile::create(dir, file_name).map_err(|err| fail("create temp file for", &err))?;

    // Keep the mode of the file being replaced.
    #[cfg(unix)]
    {
        if let Ok(metadata) = fs::metadata(path) {
            fs::set_permissions(&staged.path, metadata.permissions())
                .map_err(|err| fail("copy permissions to temp", &err))?;
        }
    }

    staged
        .file
        .write_all(content)
        .and_then(|()| staged.file.sync_all())
        .map_err(|err| fail("write temp", &err))?;
    staged.commit(path).map_err(|err| fail("replace", &err))?;

    #[cfg(unix)]
    {
        if let Err(err) = fs::File::open(dir).and_then(|d| d.sync_all()) {
            log::warn!("Directory sync after writing {} failed: {}", label, err);
        }
    }

    Ok(())
}
