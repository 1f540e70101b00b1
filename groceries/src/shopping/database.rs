// This file is part of the product Groceries.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use super::category::Category;
use super::identifier::{ItemId, canonicalize, derive_id};
use serde::{Deserialize, Serialize};

pub const CURRENT_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct CatalogEntry {
    pub id: ItemId,
    pub name: String,
}

impl CatalogEntry {
    pub fn new(name: String) -> Self {
        Self {
            id: derive_id(&name),
            name,
        }
    }
}

/// Current to-buy names per category, most recently added first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ActiveLists {
    #[serde(rename = "Groceries", default)]
    pub groceries: Vec<String>,
    #[serde(rename = "Alcohol", default)]
    pub alcohol: Vec<String>,
}

impl ActiveLists {
    pub fn list(&self, category: Category) -> &[String] {
        match category {
            Category::Groceries => &self.groceries,
            Category::Alcohol => &self.alcohol,
        }
    }

    fn list_mut(&mut self, category: Category) -> &mut Vec<String> {
        match category {
            Category::Groceries => &mut self.groceries,
            Category::Alcohol => &mut self.alcohol,
        }
    }
}

/// Aggregate root persisted as the snapshot.
///
/// Field names match the snapshot layout written by earlier releases
/// (`active`, `Groceries`, `Alcohol`); `version` was added later and reads as
/// 0 when absent.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Database {
    #[serde(default)]
    pub version: u32,
    #[serde(default)]
    pub active: ActiveLists,
    #[serde(rename = "Groceries", default)]
    groceries: Vec<CatalogEntry>,
    #[serde(rename = "Alcohol", default)]
    alcohol: Vec<CatalogEntry>,
}

impl Default for Database {
    fn default() -> Self {
        Self::new()
    }
}

impl Database {
    pub fn new() -> Self {
        Self {
            version: CURRENT_SCHEMA_VERSION,
            active: ActiveLists::default(),
            groceries: Vec::new(),
            alcohol: Vec::new(),
        }
    }

    pub fn catalog(&self, category: Category) -> &[CatalogEntry] {
        match category {
            Category::Groceries => &self.groceries,
            Category::Alcohol => &self.alcohol,
        }
    }

    fn catalog_mut(&mut self, category: Category) -> &mut Vec<CatalogEntry> {
        match category {
            Category::Groceries => &mut self.groceries,
            Category::Alcohol => &mut self.alcohol,
        }
    }

    pub fn active_list(&self, category: Category) -> &[String] {
        self.active.list(category)
    }

    /// Records `name` in the category's catalog under its canonical form.
    /// Any entry with the same derived id is dropped and the new entry goes to
    /// the front.
    pub fn upsert_catalog(&mut self, category: Category, name: &str) -> CatalogEntry {
        let entry = CatalogEntry::new(canonicalize(name));
        self.insert_catalog(category, entry.clone());
        entry
    }

    fn insert_catalog(&mut self, category: Category, entry: CatalogEntry) {
        let catalog = self.catalog_mut(category);
        catalog.retain(|existing| existing.id != entry.id);
        catalog.insert(0, entry);
    }

    /// Removes the catalog entry whose name equals `name` exactly.
    pub fn remove_from_catalog(&mut self, category: Category, name: &str) -> Option<CatalogEntry> {
        let catalog = self.catalog_mut(category);
        let position = catalog.iter().position(|entry| entry.name == name)?;
        Some(catalog.remove(position))
    }

    /// Puts the canonical form of `name` at the front of the active list,
    /// dropping an earlier occurrence. Returns the canonical name.
    pub fn add_active(&mut self, category: Category, name: &str) -> String {
        let name = canonicalize(name);
        self.push_active(category, name.clone());
        name
    }

    fn push_active(&mut self, category: Category, name: String) {
        let list = self.active.list_mut(category);
        list.retain(|existing| existing != &name);
        list.insert(0, name);
    }

    /// Adds `raw_name` to both the active list and the catalog. The name is
    /// canonicalized once, so the active name always derives the catalog id.
    pub fn add_item(&mut self, category: Category, raw_name: &str) -> CatalogEntry {
        let entry = CatalogEntry::new(canonicalize(raw_name));
        self.push_active(category, entry.name.clone());
        self.insert_catalog(category, entry.clone());
        entry
    }

    /// Removes `name` from the active list by exact match. Returns whether it
    /// was present.
    pub fn remove_active(&mut self, category: Category, name: &str) -> bool {
        let list = self.active.list_mut(category);
        match list.iter().position(|existing| existing == name) {
            Some(position) => {
                list.remove(position);
                true
            }
            None => false,
        }
    }

    /// Active names without a catalog entry of the same derived id. Should be
    /// empty; anything listed here points at an interrupted earlier write.
    pub fn orphaned_active(&self) -> Vec<(Category, String)> {
        let mut orphans = Vec::new();
        for category in Category::ALL {
            let catalog = self.catalog(category);
            for name in self.active_list(category) {
                let id = derive_id(name);
                if !catalog.iter().any(|entry| entry.id == id) {
                    orphans.push((category, name.clone()));
                }
            }
        }
        orphans
    }
}
