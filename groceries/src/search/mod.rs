// This file is part of the product Groceries.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use crate::shopping::{CatalogEntry, Category, Database, ItemId};
use async_trait::async_trait;
use std::fmt;

pub mod meili;
pub mod memory;
pub mod readiness;

pub use meili::MeiliSearchIndex;
pub use memory::MemoryIndex;
pub use readiness::{ReadinessPolicy, wait_until_ready};

/// Maximum number of names returned by a search.
pub const SEARCH_RESULT_LIMIT: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    /// The engine could not be reached or did not answer in time.
    Unavailable(String),
    /// The engine answered with a non-success status.
    Rejected { status: u16, message: String },
    InvalidResponse(String),
}

impl fmt::Display for SearchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchError::Unavailable(msg) => write!(f, "Search engine unavailable: {}", msg),
            SearchError::Rejected { status, message } => {
                write!(f, "Search engine rejected request ({}): {}", status, message)
            }
            SearchError::InvalidResponse(msg) => {
                write!(f, "Invalid search engine response: {}", msg)
            }
        }
    }
}

impl std::error::Error for SearchError {}

/// Names returned by one search, best match first. Consumed once; searching
/// again queries the engine again.
#[derive(Debug)]
pub struct SearchHits {
    names: std::vec::IntoIter<String>,
}

impl SearchHits {
    pub fn new(mut names: Vec<String>) -> Self {
        names.truncate(SEARCH_RESULT_LIMIT);
        Self {
            names: names.into_iter(),
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }
}

impl Iterator for SearchHits {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        self.names.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.names.size_hint()
    }
}

impl ExactSizeIterator for SearchHits {}

/// Full-text index with one sub-index per [`Category`], keyed by item id.
///
/// The index is derived from the catalogs and can always be rebuilt from
/// them with [`SearchIndex::rebuild`].
#[async_trait]
pub trait SearchIndex: Send + Sync {
    async fn health(&self) -> Result<(), SearchError>;

    /// Drops every index and recreates one empty index per category.
    async fn reset(&self) -> Result<(), SearchError>;

    /// Adds the entries, replacing documents with the same id.
    async fn upsert(&self, category: Category, entries: &[CatalogEntry])
    -> Result<(), SearchError>;

    /// Removes the document with `id`. Missing documents are not an error.
    async fn delete(&self, category: Category, id: ItemId) -> Result<(), SearchError>;

    async fn search(&self, category: Category, query: &str) -> Result<SearchHits, SearchError>;

    /// Resets the index and pushes every catalog entry of `db`. Returns the
    /// number of documents pushed.
    async fn rebuild(&self, db: &Database) -> Result<usize, SearchError> {
        self.reset().await?;
        let mut pushed = 0;
        for category in Category::ALL {
            let catalog = db.catalog(category);
            if catalog.is_empty() {
                continue;
            }
            self.upsert(category, catalog).await?;
            pushed += catalog.len();
        }
        Ok(pushed)
    }
}
