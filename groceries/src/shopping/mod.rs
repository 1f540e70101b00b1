// This file is part of the product Groceries.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

pub mod category;
pub mod database;
pub mod identifier;
pub mod snapshot;
pub mod store;

pub use category::{Category, CategoryError};
pub use database::{ActiveLists, CURRENT_SCHEMA_VERSION, CatalogEntry, Database};
pub use identifier::{ItemId, canonicalize, derive_id};
pub use snapshot::{FileSnapshotStore, SnapshotError, SnapshotStore};
pub use store::{ShoppingStore, StoreError};
