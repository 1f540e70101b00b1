// This file is part of the product Groceries.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use actix_web::{HttpResponse, web};

use super::error::ApiError;
use crate::app_state::AppState;
use crate::shopping::Category;

/// The router decodes path segments once; clients that double-encode names
/// (a literal `%` or `/` in an item) need one more pass.
fn decode_segment(raw: &str) -> String {
    String::from_utf8_lossy(&urlencoding::decode_binary(raw.as_bytes())).into_owned()
}

fn parse_target(path: (String, String)) -> Result<(Category, String), ApiError> {
    let (category, name) = path;
    let category = decode_segment(&category).parse::<Category>()?;
    Ok((category, decode_segment(&name)))
}

pub async fn get_active(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(state.store.active().await)
}

pub async fn add_item(
    state: web::Data<AppState>,
    path: web::Path<(String, String)>,
) -> Result<HttpResponse, ApiError> {
    let (category, name) = parse_target(path.into_inner())?;
    let active = state.store.add_item(category, &name).await?;
    Ok(HttpResponse::Ok().json(active))
}

pub async fn remove_active(
    state: web::Data<AppState>,
    path: web::Path<(String, String)>,
) -> Result<HttpResponse, ApiError> {
    let (category, name) = parse_target(path.into_inner())?;
    let active = state.store.remove_active(category, &name).await?;
    Ok(HttpResponse::Ok().json(active))
}

pub async fn remove_from_catalog(
    state: web::Data<AppState>,
    path: web::Path<(String, String)>,
) -> Result<HttpResponse, ApiError> {
    let (category, name) = parse_target(path.into_inner())?;
    let active = state.store.remove_from_catalog(category, &name).await?;
    Ok(HttpResponse::Ok().json(active))
}

pub async fn search(
    state: web::Data<AppState>,
    path: web::Path<(String, String)>,
) -> Result<HttpResponse, ApiError> {
    let (category, query) = parse_target(path.into_inner())?;
    let names = state.store.search(category, &query).await?;
    Ok(HttpResponse::Ok().json(names))
}
