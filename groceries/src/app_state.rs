// This file is part of the product Groceries.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use std::sync::Arc;

use log::info;

use crate::config::{SearchEngine, ValidatedConfig, ValidatedSearchConfig};
use crate::runtime_paths::RuntimePaths;
use crate::search::{MeiliSearchIndex, MemoryIndex, SearchError, SearchIndex, wait_until_ready};
use crate::shopping::{FileSnapshotStore, ShoppingStore, StoreError};

pub struct AppState {
    pub store: ShoppingStore,
    pub runtime_paths: RuntimePaths,
}

impl AppState {
    pub fn new(store: ShoppingStore, runtime_paths: RuntimePaths) -> Self {
        Self {
            store,
            runtime_paths,
        }
    }

    /// Connects to the configured search engine, waits for it to come up and
    /// opens the snapshot under `runtime_paths`.
    pub async fn open(
        config: &ValidatedConfig,
        runtime_paths: RuntimePaths,
    ) -> Result<Self, StoreError> {
        let index = build_search_index(&config.search)?;
        wait_until_ready(index.as_ref(), config.search.readiness).await?;
        let snapshots = FileSnapshotStore::new(runtime_paths.db_file.clone())?;
        let store = ShoppingStore::open(Box::new(snapshots), index).await?;
        Ok(Self::new(store, runtime_paths))
    }
}

pub fn build_search_index(
    config: &ValidatedSearchConfig,
) -> Result<Arc<dyn SearchIndex>, SearchError> {
    match config.engine {
        SearchEngine::Meilisearch => {
            info!("Using Meilisearch at {}", config.url);
            let index = MeiliSearchIndex::new(&config.url, config.api_key.clone(), config.timeout)?;
            Ok(Arc::new(index))
        }
        SearchEngine::Memory => {
            info!("Using in-memory search index");
            Ok(Arc::new(MemoryIndex::new()))
        }
    }
}
