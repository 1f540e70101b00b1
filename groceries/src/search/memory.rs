// This file is part of the product Groceries.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use super::{SearchError, SearchHits, SearchIndex};
use crate::shopping::{CatalogEntry, Category, ItemId};
use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::sync::RwLock;

type Documents = BTreeMap<ItemId, String>;

/// In-process index for running without a search engine.
///
/// Matches are case-insensitive: names starting with the query rank first,
/// then names with a word starting with it, then any other substring match.
/// Ties sort by name.
#[derive(Default)]
pub struct MemoryIndex {
    indexes: RwLock<HashMap<Category, Documents>>,
}

impl MemoryIndex {
    pub fn new() -> Self {
        let index = Self::default();
        index.recreate();
        index
    }

    fn recreate(&self) {
        let fresh: HashMap<Category, Documents> = Category::ALL
            .into_iter()
            .map(|category| (category, Documents::new()))
            .collect();
        match self.indexes.write() {
            Ok(mut guard) => *guard = fresh,
            Err(poisoned) => {
                log::error!("MemoryIndex lock poisoned on reset; recovering");
                *poisoned.into_inner() = fresh;
            }
        }
    }

    /// Documents of one category ordered by id.
    pub fn documents(&self, category: Category) -> Vec<CatalogEntry> {
        let guard = match self.indexes.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        guard
            .get(&category)
            .map(|docs| {
                docs.iter()
                    .map(|(id, name)| CatalogEntry {
                        id: *id,
                        name: name.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    fn with_documents<R>(&self, category: Category, f: impl FnOnce(&mut Documents) -> R) -> R {
        let mut guard = match self.indexes.write() {
            Ok(guard) => guard,
            Err(poisoned) => {
                log::error!("MemoryIndex lock poisoned on write; recovering");
                poisoned.into_inner()
            }
        };
        f(guard.entry(category).or_default())
    }
}

fn match_rank(name: &str, query: &str) -> Option<u8> {
    let name = name.to_lowercase();
    if name.starts_with(query) {
        Some(0)
    } else if name.split_whitespace().any(|word| word.starts_with(query)) {
        Some(1)
    } else if name.contains(query) {
        Some(2)
    } else {
        None
    }
}

#[async_trait]
impl SearchIndex for MemoryIndex {
    async fn health(&self) -> Result<(), SearchError> {
        Ok(())
    }

    async fn reset(&self) -> Result<(), SearchError> {
        self.recreate();
        Ok(())
    }

    async fn upsert(
        &self,
        category: Category,
        entries: &[CatalogEntry],
    ) -> Result<(), SearchError> {
        self.with_documents(category, |docs| {
            for entry in entries {
                docs.insert(entry.id, entry.name.clone());
            }
        });
        Ok(())
    }

    async fn delete(&self, category: Category, id: ItemId) -> Result<(), SearchError> {
        self.with_documents(category, |docs| {
            docs.remove(&id);
        });
        Ok(())
    }

    async fn search(&self, category: Category, query: &str) -> Result<SearchHits, SearchError> {
        let query = query.trim().to_lowercase();
        let mut ranked: Vec<(u8, String)> = self.with_documents(category, |docs| {
            docs.values()
                .filter_map(|name| match_rank(name, &query).map(|rank| (rank, name.clone())))
                .collect()
        });
        ranked.sort();
        Ok(SearchHits::new(
            ranked.into_iter().map(|(_, name)| name).collect(),
        ))
    }
}
