// This file is part of the product Groceries.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

#![allow(dead_code)]

use crate::config::{
    FrontendConfig, LoggingConfig, SearchEngine, ServerConfig, ValidatedConfig,
    ValidatedSearchConfig,
};
use crate::search::ReadinessPolicy;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct TestConfigBuilder {
    config: ValidatedConfig,
}

impl Default for TestConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestConfigBuilder {
    /// Localhost server backed by the in-memory search engine.
    pub fn new() -> Self {
        Self {
            config: ValidatedConfig {
                server: ServerConfig {
                    host: "127.0.0.1".to_string(),
                    port: 8000,
                    workers: 1,
                },
                logging: LoggingConfig {
                    level: "info".to_string(),
                },
                search: ValidatedSearchConfig {
                    engine: SearchEngine::Memory,
                    url: "http://127.0.0.1:7700".to_string(),
                    api_key: None,
                    timeout: Duration::from_secs(2),
                    readiness: ReadinessPolicy {
                        max_attempts: 3,
                        initial_backoff: Duration::from_millis(10),
                        max_backoff: Duration::from_millis(40),
                    },
                },
                frontend: FrontendConfig {
                    dir: "static".to_string(),
                },
                dev_mode: false,
            },
        }
    }

    pub fn with_dev_mode(mut self, dev_mode: bool) -> Self {
        self.config.dev_mode = dev_mode;
        self
    }

    pub fn with_meilisearch(mut self, url: &str, api_key: Option<&str>) -> Self {
        self.config.search.engine = SearchEngine::Meilisearch;
        self.config.search.url = url.to_string();
        self.config.search.api_key = api_key.map(str::to_string);
        self
    }

    pub fn build(self) -> ValidatedConfig {
        self.config
    }
}

pub fn test_config() -> ValidatedConfig {
    TestConfigBuilder::new().build()
}
