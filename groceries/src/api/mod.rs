// This file is part of the product Groceries.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use actix_web::web;

pub mod error;
mod items;

pub use error::ApiError;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("", web::get().to(items::get_active))
            // Older clients fetched the lists from /api/key.
            .route("/key", web::get().to(items::get_active))
            .route(
                "/search/{category}/{search_input}",
                web::get().to(items::search),
            )
            .route(
                "/meili/{category}/{item_name}",
                web::delete().to(items::remove_from_catalog),
            )
            .route("/{category}/{item_name}", web::post().to(items::add_item))
            .route(
                "/{category}/{item_name}",
                web::delete().to(items::remove_active),
            ),
    );
}
