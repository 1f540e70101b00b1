// This file is part of the product Groceries.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde_json::json;
use std::fmt;

use crate::shopping::{CategoryError, SnapshotError, StoreError};
use crate::search::SearchError;

#[derive(Debug)]
pub enum ApiError {
    InvalidCategory(CategoryError),
    Store(StoreError),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::InvalidCategory(err) => write!(f, "{}", err),
            ApiError::Store(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<CategoryError> for ApiError {
    fn from(err: CategoryError) -> Self {
        ApiError::InvalidCategory(err)
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        ApiError::Store(err)
    }
}

impl From<SnapshotError> for ApiError {
    fn from(err: SnapshotError) -> Self {
        ApiError::Store(StoreError::Snapshot(err))
    }
}

impl From<SearchError> for ApiError {
    fn from(err: SearchError) -> Self {
        ApiError::Store(StoreError::Search(err))
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidCategory(_) | ApiError::Store(StoreError::EmptyName) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Store(StoreError::Search(_)) => StatusCode::BAD_GATEWAY,
            ApiError::Store(StoreError::Snapshot(_)) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            log::error!("Request failed ({}): {}", status.as_u16(), self);
        } else {
            log::debug!("Rejected request ({}): {}", status.as_u16(), self);
        }
        HttpResponse::build(status).json(json!({ "error": self.to_string() }))
    }
}
