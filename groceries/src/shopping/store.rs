// This file is part of the product Groceries.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use super::category::Category;
use super::database::{ActiveLists, CatalogEntry, Database};
use super::identifier::{canonicalize, derive_id};
use super::snapshot::{SnapshotError, SnapshotStore};
use crate::search::{SearchError, SearchIndex};
use log::{error, info, warn};
use std::fmt;
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    EmptyName,
    Snapshot(SnapshotError),
    Search(SearchError),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::EmptyName => write!(f, "Item name is empty"),
            StoreError::Snapshot(err) => write!(f, "{}", err),
            StoreError::Search(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::EmptyName => None,
            StoreError::Snapshot(err) => Some(err),
            StoreError::Search(err) => Some(err),
        }
    }
}

impl From<SnapshotError> for StoreError {
    fn from(err: SnapshotError) -> Self {
        StoreError::Snapshot(err)
    }
}

impl From<SearchError> for StoreError {
    fn from(err: SearchError) -> Self {
        StoreError::Search(err)
    }
}

/// Owner of the process-wide [`Database`].
///
/// Every mutation runs under one lock as apply, persist, then index update.
/// A failed persist restores the previous in-memory state and leaves the
/// index alone. A failed index update after a successful persist is
/// reported to the caller; the index can be rebuilt from the catalogs with
/// [`ShoppingStore::rebuild_index`]. Searches never take the lock.
pub struct ShoppingStore {
    db: Mutex<Database>,
    snapshots: Arc<dyn SnapshotStore>,
    index: Arc<dyn SearchIndex>,
}

/// Runs the blocking snapshot write on tokio's blocking pool.
async fn save_snapshot(snapshots: &Arc<dyn SnapshotStore>, db: Database) -> Result<(), SnapshotError> {
    let snapshots = Arc::clone(snapshots);
    tokio::task::spawn_blocking(move || snapshots.save(&db))
        .await
        .map_err(|err| SnapshotError::Io(format!("snapshot task failed: {}", err)))?
}

fn resolve_name(db: &Database, category: Category, name: &str) -> String {
    let stored = db.active_list(category).iter().any(|existing| existing == name)
        || db.catalog(category).iter().any(|entry| entry.name == name);
    if stored {
        name.to_string()
    } else {
        canonicalize(name)
    }
}

impl ShoppingStore {
    /// Loads the snapshot, or on first start resets the search index and
    /// writes an empty snapshot.
    pub async fn open(
        snapshots: Box<dyn SnapshotStore>,
        index: Arc<dyn SearchIndex>,
    ) -> Result<Self, StoreError> {
        let snapshots: Arc<dyn SnapshotStore> = Arc::from(snapshots);
        let db = match snapshots.load()? {
            Some(db) => {
                info!(
                    "Loaded snapshot: {} groceries, {} alcohol in catalog",
                    db.catalog(Category::Groceries).len(),
                    db.catalog(Category::Alcohol).len()
                );
                for (category, name) in db.orphaned_active() {
                    warn!("Active item '{}' in {} has no catalog entry", name, category);
                }
                db
            }
            None => {
                info!("No snapshot found; creating empty database and search indexes");
                index.reset().await?;
                let db = Database::new();
                save_snapshot(&snapshots, db.clone()).await?;
                db
            }
        };

        Ok(Self {
            db: Mutex::new(db),
            snapshots,
            index,
        })
    }

    pub async fn active(&self) -> ActiveLists {
        self.db.lock().await.active.clone()
    }

    pub async fn catalog(&self, category: Category) -> Vec<CatalogEntry> {
        self.db.lock().await.catalog(category).to_vec()
    }

    /// Puts `raw_name` at the front of the active list and the catalog under
    /// its canonical form, then pushes it to the search index.
    pub async fn add_item(
        &self,
        category: Category,
        raw_name: &str,
    ) -> Result<ActiveLists, StoreError> {
        if raw_name.trim().is_empty() {
            return Err(StoreError::EmptyName);
        }

        let mut db = self.db.lock().await;
        let previous = db.clone();
        let entry = db.add_item(category, raw_name);
        self.persist(&mut db, previous).await?;
        let active = db.active.clone();

        if let Err(err) = self
            .index
            .upsert(category, std::slice::from_ref(&entry))
            .await
        {
            error!(
                "Saved '{}' in {} but search index update failed: {}",
                entry.name, category, err
            );
            return Err(err.into());
        }

        info!("Added '{}' to {} (id {})", entry.name, category, entry.id);
        Ok(active)
    }

    /// Drops `name` from the active list only. The catalog keeps it for
    /// search. Absent names are a no-op.
    ///
    /// Removal matches the stored display name exactly. A name that matches
    /// nothing is retried in canonical form, so `milk` removes `Milk`.
    pub async fn remove_active(
        &self,
        category: Category,
        name: &str,
    ) -> Result<ActiveLists, StoreError> {
        let mut db = self.db.lock().await;
        let name = resolve_name(&db, category, name);
        let previous = db.clone();
        if db.remove_active(category, &name) {
            self.persist(&mut db, previous).await?;
            info!("Removed '{}' from active {}", name, category);
        }
        Ok(db.active.clone())
    }

    /// Forgets `name` entirely: catalog, active list and search index.
    pub async fn remove_from_catalog(
        &self,
        category: Category,
        name: &str,
    ) -> Result<ActiveLists, StoreError> {
        let mut db = self.db.lock().await;
        let name = resolve_name(&db, category, name);
        let previous = db.clone();
        let removed_catalog = db.remove_from_catalog(category, &name).is_some();
        let removed_active = db.remove_active(category, &name);
        if removed_catalog || removed_active {
            self.persist(&mut db, previous).await?;
        }
        let active = db.active.clone();

        let id = derive_id(&name);
        if let Err(err) = self.index.delete(category, id).await {
            error!(
                "Removed '{}' from {} but search index delete failed: {}",
                name, category, err
            );
            return Err(err.into());
        }

        info!("Removed '{}' from {} catalog (id {})", name, category, id);
        Ok(active)
    }

    pub async fn search(&self, category: Category, query: &str) -> Result<Vec<String>, StoreError> {
        Ok(self.index.search(category, query).await?.collect())
    }

    /// Rebuilds the search index from the catalogs. Mutations wait until the
    /// rebuild finishes.
    pub async fn rebuild_index(&self) -> Result<usize, StoreError> {
        let db = self.db.lock().await;
        let pushed = self.index.rebuild(&db).await?;
        info!("Rebuilt search index with {} document(s)", pushed);
        Ok(pushed)
    }

    /// Saves `db` while the caller still holds the lock, restoring
    /// `previous` when the save fails.
    async fn persist(&self, db: &mut Database, previous: Database) -> Result<(), StoreError> {
        if let Err(err) = save_snapshot(&self.snapshots, db.clone()).await {
            error!("Snapshot save failed; reverting in-memory change: {}", err);
            *db = previous;
            return Err(err.into());
        }
        Ok(())
    }
}
