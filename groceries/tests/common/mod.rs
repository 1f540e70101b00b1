// This file is part of the product Groceries.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

#![allow(dead_code)]

pub mod fake_meili;

use actix_web::body::MessageBody;
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, test, web};
use groceries::api;
use groceries::app_state::AppState;
use groceries::config::ValidatedConfig;
use groceries::frontend;
use groceries::runtime_paths::RuntimePaths;
use groceries::shopping::{CatalogEntry, Category};
use groceries::util::test_config::TestConfigBuilder;
use groceries::util::test_fixtures::TestFixtureRoot;
use serde_json::Value;
use std::path::PathBuf;

pub struct TestHarness {
    pub fixture: TestFixtureRoot,
    pub config: ValidatedConfig,
    pub runtime_paths: RuntimePaths,
    pub state: web::Data<AppState>,
}

impl TestHarness {
    /// Fresh runtime root backed by the in-memory search engine.
    pub async fn new() -> Self {
        Self::with_config(TestConfigBuilder::new().build()).await
    }

    pub async fn with_config(config: ValidatedConfig) -> Self {
        let fixture = TestFixtureRoot::new_unique("api").expect("fixture root");
        let runtime_paths = fixture.runtime_paths().expect("runtime paths");
        let state = AppState::open(&config, runtime_paths.clone())
            .await
            .expect("open app state");
        Self {
            fixture,
            config,
            runtime_paths,
            state: web::Data::new(state),
        }
    }

    /// Opens the same runtime root again, as a process restart would.
    pub async fn restart(&self) -> web::Data<AppState> {
        let state = AppState::open(&self.config, self.runtime_paths.clone())
            .await
            .expect("reopen app state");
        web::Data::new(state)
    }

    pub fn frontend_dir(&self) -> Option<PathBuf> {
        frontend::frontend_dir(&self.config, &self.runtime_paths)
    }

    pub async fn catalog_names(&self, category: Category) -> Vec<String> {
        self.state
            .store
            .catalog(category)
            .await
            .into_iter()
            .map(|entry: CatalogEntry| entry.name)
            .collect()
    }
}

pub fn build_test_app(
    state: web::Data<AppState>,
    frontend_dir: Option<PathBuf>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(state)
        .configure(api::configure)
        .configure(move |cfg| frontend::configure(cfg, frontend_dir.as_deref()))
}

pub async fn read_json<B>(resp: ServiceResponse<B>) -> Value
where
    B: MessageBody,
{
    let body = test::read_body(resp).await;
    serde_json::from_slice(&body).expect("json body")
}

pub fn names(value: &Value) -> Vec<String> {
    value
        .as_array()
        .expect("json array")
        .iter()
        .map(|name| name.as_str().expect("string").to_string())
        .collect()
}
