// This file is part of the product Groceries.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use crate::search::ReadinessPolicy;
use log::warn;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

pub const ENV_MEILI_URL: &str = "MEILI_URL";
pub const ENV_MEILI_KEY: &str = "MEILI_KEY";
pub const ENV_DEV: &str = "DEV";

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

#[derive(Debug)]
pub enum ConfigError {
    LoadError(String),
    ValidationError(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::LoadError(msg) => write!(f, "Configuration load error: {}", msg),
            ConfigError::ValidationError(msg) => {
                write!(f, "Configuration validation error: {}", msg)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub frontend: FrontendConfig,
    #[serde(default)]
    pub dev_mode: bool,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_workers")]
    pub workers: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: default_workers(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_workers() -> usize {
    2
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SearchEngine {
    #[default]
    Meilisearch,
    Memory,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SearchConfig {
    #[serde(default)]
    pub engine: SearchEngine,
    #[serde(default = "default_search_url")]
    pub url: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
    #[serde(default)]
    pub startup: StartupConfig,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            engine: SearchEngine::default(),
            url: default_search_url(),
            api_key: None,
            timeout_seconds: default_timeout_seconds(),
            startup: StartupConfig::default(),
        }
    }
}

fn default_search_url() -> String {
    "http://127.0.0.1:7700".to_string()
}

fn default_timeout_seconds() -> u64 {
    10
}

/// How long to wait for the search engine before giving up at startup.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct StartupConfig {
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    #[serde(default = "default_initial_backoff_ms")]
    pub initial_backoff_ms: u64,
    #[serde(default = "default_max_backoff_ms")]
    pub max_backoff_ms: u64,
}

impl Default for StartupConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            initial_backoff_ms: default_initial_backoff_ms(),
            max_backoff_ms: default_max_backoff_ms(),
        }
    }
}

fn default_max_attempts() -> u32 {
    10
}

fn default_initial_backoff_ms() -> u64 {
    500
}

fn default_max_backoff_ms() -> u64 {
    5000
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct FrontendConfig {
    /// Directory of the bundled web client, relative to the runtime root.
    #[serde(default = "default_frontend_dir")]
    pub dir: String,
}

impl Default for FrontendConfig {
    fn default() -> Self {
        Self {
            dir: default_frontend_dir(),
        }
    }
}

fn default_frontend_dir() -> String {
    "static".to_string()
}

/// Process environment values that take precedence over `config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvOverrides {
    pub meili_url: Option<String>,
    pub meili_key: Option<String>,
    pub dev: bool,
}

impl EnvOverrides {
    pub fn from_env() -> Self {
        Self {
            meili_url: std::env::var(ENV_MEILI_URL).ok(),
            meili_key: std::env::var(ENV_MEILI_KEY).ok(),
            dev: std::env::var_os(ENV_DEV).is_some(),
        }
    }

    fn apply(&self, config: &mut Config) {
        if let Some(url) = &self.meili_url {
            config.search.url = url.clone();
        }
        if let Some(key) = &self.meili_key {
            config.search.api_key = Some(key.clone());
        }
        if self.dev {
            config.dev_mode = true;
        }
    }
}

#[derive(Debug, Clone)]
pub struct ValidatedSearchConfig {
    pub engine: SearchEngine,
    pub url: String,
    pub api_key: Option<String>,
    pub timeout: Duration,
    pub readiness: ReadinessPolicy,
}

#[derive(Debug, Clone)]
pub struct ValidatedConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub search: ValidatedSearchConfig,
    pub frontend: FrontendConfig,
    pub dev_mode: bool,
}

impl Config {
    pub fn load(root: &Path) -> Result<Self, ConfigError> {
        let config_path = root.join("config.yaml");
        let config_content = fs::read_to_string(&config_path).map_err(|e| {
            ConfigError::LoadError(format!(
                "Failed to read config file '{}': {}",
                config_path.display(),
                e
            ))
        })?;
        Self::parse(&config_content).map_err(|e| {
            ConfigError::LoadError(format!(
                "Failed to parse config file '{}': {}",
                config_path.display(),
                e
            ))
        })
    }

    fn parse(content: &str) -> Result<Self, serde_yaml::Error> {
        // An empty file is a valid, all-defaults config.
        if content.trim().is_empty() {
            return Ok(Config::default());
        }
        serde_yaml::from_str(content)
    }

    /// Loads and validates configuration at startup, applying environment
    /// overrides. If validation fails, the application should not start.
    pub fn load_and_validate(
        root: &Path,
        env: &EnvOverrides,
    ) -> Result<ValidatedConfig, ConfigError> {
        let mut config = Self::load(root)?;
        env.apply(&mut config);
        config.validate()
    }

    pub fn validate(self) -> Result<ValidatedConfig, ConfigError> {
        Self::validate_server(&self.server)?;
        Self::validate_logging(&self.logging)?;
        let search = Self::validate_search(&self.search, self.dev_mode)?;

        if self.dev_mode {
            warn!("Development mode enabled; the bundled frontend will not be served");
        }

        Ok(ValidatedConfig {
            server: self.server,
            logging: self.logging,
            search,
            frontend: self.frontend,
            dev_mode: self.dev_mode,
        })
    }

    fn validate_server(server: &ServerConfig) -> Result<(), ConfigError> {
        if server.host.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "server.host cannot be empty".to_string(),
            ));
        }
        if server.port == 0 {
            return Err(ConfigError::ValidationError(
                "server.port must be greater than 0".to_string(),
            ));
        }
        if server.workers == 0 {
            return Err(ConfigError::ValidationError(
                "server.workers must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    fn validate_logging(logging: &LoggingConfig) -> Result<(), ConfigError> {
        let level = logging.level.trim().to_ascii_lowercase();
        if !LOG_LEVELS.contains(&level.as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "logging.level must be one of {}, got: {}",
                LOG_LEVELS.join(", "),
                logging.level
            )));
        }
        Ok(())
    }

    fn validate_search(
        search: &SearchConfig,
        dev_mode: bool,
    ) -> Result<ValidatedSearchConfig, ConfigError> {
        if !(1..=300).contains(&search.timeout_seconds) {
            return Err(ConfigError::ValidationError(format!(
                "search.timeout_seconds must be between 1 and 300, got: {}",
                search.timeout_seconds
            )));
        }

        let startup = &search.startup;
        if startup.max_attempts < 1 {
            return Err(ConfigError::ValidationError(
                "search.startup.max_attempts must be at least 1".to_string(),
            ));
        }
        if startup.initial_backoff_ms > startup.max_backoff_ms {
            return Err(ConfigError::ValidationError(format!(
                "search.startup.initial_backoff_ms ({}) cannot exceed max_backoff_ms ({})",
                startup.initial_backoff_ms, startup.max_backoff_ms
            )));
        }

        let url = search.url.trim().to_string();
        let api_key = search
            .api_key
            .as_ref()
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty());

        if search.engine == SearchEngine::Meilisearch {
            if !is_http_url(&url) {
                return Err(ConfigError::ValidationError(format!(
                    "search.url must be an http:// or https:// URL, got: '{}'",
                    search.url
                )));
            }
            if api_key.is_none() && !dev_mode {
                return Err(ConfigError::ValidationError(format!(
                    "search.api_key (or {}) is required unless dev_mode is set",
                    ENV_MEILI_KEY
                )));
            }
        }

        Ok(ValidatedSearchConfig {
            engine: search.engine,
            url,
            api_key,
            timeout: Duration::from_secs(search.timeout_seconds),
            readiness: ReadinessPolicy {
                max_attempts: startup.max_attempts,
                initial_backoff: Duration::from_millis(startup.initial_backoff_ms),
                max_backoff: Duration::from_millis(startup.max_backoff_ms),
            },
        })
    }
}

fn is_http_url(url: &str) -> bool {
    url.strip_prefix("http://")
        .or_else(|| url.strip_prefix("https://"))
        .is_some_and(|rest| !rest.trim_matches('/').is_empty())
}

impl ValidatedConfig {
    pub fn bind_address(&self) -> (&str, u16) {
        (self.server.host.as_str(), self.server.port)
    }

    pub fn serves_frontend(&self) -> bool {
        !self.dev_mode
    }
}
