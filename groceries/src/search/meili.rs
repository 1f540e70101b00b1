// This file is part of the product Groceries.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use super::{SEARCH_RESULT_LIMIT, SearchError, SearchHits, SearchIndex};
use crate::shopping::{CatalogEntry, Category, ItemId};
use async_trait::async_trait;
use futures_util::future::try_join_all;
use log::{debug, info};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde_json::json;
use std::time::{Duration, Instant};

const PRIMARY_KEY: &str = "id";
const TASK_POLL_INTERVAL: Duration = Duration::from_millis(50);
const INDEX_LIST_LIMIT: usize = 1000;

#[derive(Deserialize)]
struct TaskInfo {
    #[serde(rename = "taskUid")]
    task_uid: u64,
}

#[derive(Deserialize)]
struct TaskStatus {
    status: String,
    #[serde(default)]
    error: Option<EngineError>,
}

#[derive(Deserialize)]
struct EngineError {
    message: String,
    #[serde(default)]
    code: Option<String>,
}

#[derive(Deserialize)]
struct IndexList {
    results: Vec<IndexInfo>,
}

#[derive(Deserialize)]
struct IndexInfo {
    uid: String,
}

#[derive(Deserialize)]
struct SearchResponse {
    hits: Vec<SearchHit>,
}

#[derive(Deserialize)]
struct SearchHit {
    name: String,
}

/// Meilisearch over its HTTP API. Category names are the index uids.
pub struct MeiliSearchIndex {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    timeout: Duration,
}

impl MeiliSearchIndex {
    pub fn new(url: &str, api_key: Option<String>, timeout: Duration) -> Result<Self, SearchError> {
        let client = Client::builder()
            .user_agent(concat!("groceries/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .map_err(|err| SearchError::Unavailable(format!("Failed to build client: {}", err)))?;
        Ok(Self {
            client,
            base_url: url.trim_end_matches('/').to_string(),
            api_key,
            timeout,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self
            .client
            .request(method, format!("{}{}", self.base_url, path));
        match &self.api_key {
            Some(key) => builder.bearer_auth(key),
            None => builder,
        }
    }

    async fn send(&self, builder: RequestBuilder) -> Result<Response, SearchError> {
        let response = builder.send().await.map_err(map_transport_error)?;
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<EngineError>(&body)
            .map(|err| err.message)
            .unwrap_or(body);
        Err(SearchError::Rejected {
            status: status.as_u16(),
            message,
        })
    }

    async fn send_json<T: for<'de> Deserialize<'de>>(
        &self,
        builder: RequestBuilder,
    ) -> Result<T, SearchError> {
        self.send(builder)
            .await?
            .json::<T>()
            .await
            .map_err(|err| SearchError::InvalidResponse(err.to_string()))
    }

    async fn enqueue(&self, builder: RequestBuilder) -> Result<u64, SearchError> {
        let task: TaskInfo = self.send_json(builder).await?;
        Ok(task.task_uid)
    }

    /// Polls a task until it leaves the queue, bounded by the client timeout.
    async fn wait_for_task(&self, task_uid: u64) -> Result<(), SearchError> {
        let deadline = Instant::now() + self.timeout;
        loop {
            let task: TaskStatus = self
                .send_json(self.request(Method::GET, &format!("/tasks/{}", task_uid)))
                .await?;
            match task.status.as_str() {
                "succeeded" => return Ok(()),
                "failed" | "canceled" => {
                    let error = task.error;
                    // Deleting an index that vanished in the meantime is fine.
                    if error
                        .as_ref()
                        .and_then(|err| err.code.as_deref())
                        .is_some_and(|code| code == "index_not_found")
                    {
                        return Ok(());
                    }
                    let message = error
                        .map(|err| err.message)
                        .unwrap_or_else(|| format!("task {} {}", task_uid, task.status));
                    return Err(SearchError::Rejected {
                        status: StatusCode::UNPROCESSABLE_ENTITY.as_u16(),
                        message,
                    });
                }
                _ => {}
            }
            if Instant::now() >= deadline {
                return Err(SearchError::Unavailable(format!(
                    "task {} still {} after {:?}",
                    task_uid, task.status, self.timeout
                )));
            }
            tokio::time::sleep(TASK_POLL_INTERVAL).await;
        }
    }

    async fn list_indexes(&self) -> Result<Vec<String>, SearchError> {
        let list: IndexList = self
            .send_json(
                self.request(Method::GET, "/indexes")
                    .query(&[("limit", INDEX_LIST_LIMIT)]),
            )
            .await?;
        Ok(list.results.into_iter().map(|index| index.uid).collect())
    }

    async fn delete_index(&self, uid: &str) -> Result<(), SearchError> {
        let task = self
            .enqueue(self.request(Method::DELETE, &format!("/indexes/{}", uid)))
            .await?;
        self.wait_for_task(task).await
    }

    async fn create_index(&self, category: Category) -> Result<(), SearchError> {
        let task = self
            .enqueue(
                self.request(Method::POST, "/indexes")
                    .json(&json!({"uid": category.as_str(), "primaryKey": PRIMARY_KEY})),
            )
            .await?;
        self.wait_for_task(task).await
    }
}

fn map_transport_error(err: reqwest::Error) -> SearchError {
    if err.is_decode() {
        SearchError::InvalidResponse(err.to_string())
    } else {
        SearchError::Unavailable(err.to_string())
    }
}

fn is_index_not_found(err: &SearchError) -> bool {
    matches!(err, SearchError::Rejected { status, .. } if *status == StatusCode::NOT_FOUND.as_u16())
}

#[async_trait]
impl SearchIndex for MeiliSearchIndex {
    async fn health(&self) -> Result<(), SearchError> {
        self.send(self.request(Method::GET, "/health")).await?;
        Ok(())
    }

    async fn reset(&self) -> Result<(), SearchError> {
        let existing = self.list_indexes().await?;
        info!("Resetting search indexes (dropping {} existing)", existing.len());
        try_join_all(existing.iter().map(|uid| self.delete_index(uid))).await?;
        for category in Category::ALL {
            self.create_index(category).await?;
        }
        Ok(())
    }

    async fn upsert(
        &self,
        category: Category,
        entries: &[CatalogEntry],
    ) -> Result<(), SearchError> {
        let task = self
            .enqueue(
                self.request(
                    Method::POST,
                    &format!("/indexes/{}/documents", category.as_str()),
                )
                .query(&[("primaryKey", PRIMARY_KEY)])
                .json(entries),
            )
            .await?;
        debug!(
            "Enqueued {} document(s) for {} (task {})",
            entries.len(),
            category,
            task
        );
        Ok(())
    }

    async fn delete(&self, category: Category, id: ItemId) -> Result<(), SearchError> {
        let path = format!("/indexes/{}/documents/{}", category.as_str(), id);
        match self.enqueue(self.request(Method::DELETE, &path)).await {
            Ok(task) => {
                debug!("Enqueued delete of {} from {} (task {})", id, category, task);
                Ok(())
            }
            Err(err) if is_index_not_found(&err) => Ok(()),
            Err(err) => Err(err),
        }
    }

    async fn search(&self, category: Category, query: &str) -> Result<SearchHits, SearchError> {
        let request = self
            .request(
                Method::POST,
                &format!("/indexes/{}/search", category.as_str()),
            )
            .json(&json!({"q": query, "limit": SEARCH_RESULT_LIMIT}));
        match self.send_json::<SearchResponse>(request).await {
            Ok(response) => Ok(SearchHits::new(
                response.hits.into_iter().map(|hit| hit.name).collect(),
            )),
            Err(err) if is_index_not_found(&err) => {
                log::warn!("Search index {} missing; returning no hits", category);
                Ok(SearchHits::empty())
            }
            Err(err) => Err(err),
        }
    }
}
