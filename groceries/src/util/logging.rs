// This file is part of the product Groceries.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use env_logger::Logger;
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::io::Write;

/// Dependency targets whose debug output is demoted to trace.
const NOISY_TARGETS: [&str; 3] = ["hyper", "reqwest", "h2"];

/// Rewrites the level of records whose target starts with a prefix.
struct LevelModifierLogger {
    inner: Logger,
    rules: Vec<(String, Level, Level)>,
}

impl LevelModifierLogger {
    fn new(inner: Logger, rules: Vec<(String, Level, Level)>) -> Self {
        LevelModifierLogger { inner, rules }
    }

    fn level_for(&self, target: &str, original: Level) -> Level {
        self.rules
            .iter()
            .find(|(prefix, from, _)| target.starts_with(prefix.as_str()) && *from == original)
            .map(|(_, _, to)| *to)
            .unwrap_or(original)
    }
}

impl Log for LevelModifierLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        let level = self.level_for(metadata.target(), metadata.level());
        let metadata = Metadata::builder()
            .level(level)
            .target(metadata.target())
            .build();
        self.inner.enabled(&metadata)
    }

    fn log(&self, record: &Record) {
        let level = self.level_for(record.target(), record.level());
        self.inner.log(
            &Record::builder()
                .level(level)
                .target(record.target())
                .args(*record.args())
                .module_path(record.module_path())
                .file(record.file())
                .line(record.line())
                .build(),
        );
    }

    fn flush(&self) {
        self.inner.flush();
    }
}

/// Maps a validated `logging.level` value to a filter. Unknown values fall
/// back to info.
pub fn level_filter(level: &str) -> LevelFilter {
    match level.trim().to_ascii_lowercase().as_str() {
        "trace" => LevelFilter::Trace,
        "debug" => LevelFilter::Debug,
        "warn" => LevelFilter::Warn,
        "error" => LevelFilter::Error,
        _ => LevelFilter::Info,
    }
}

fn demotion_rules() -> Vec<(String, Level, Level)> {
    NOISY_TARGETS
        .iter()
        .map(|target| (target.to_string(), Level::Debug, Level::Trace))
        .collect()
}

/// Installs the process logger: `<UTC time> [LEVEL] target: message` on
/// stdout. `RUST_LOG` still refines the configured level.
pub fn init_logging(level: &str) -> Result<(), SetLoggerError> {
    let logger = env_logger::Builder::new()
        .filter_level(level_filter(level))
        .parse_default_env()
        .target(env_logger::Target::Stdout)
        .format(|buf, record| {
            writeln!(
                buf,
                "{} [{}] {}: {}",
                chrono::Utc::now().format("%Y-%m-%d %H:%M:%S%.3f UTC"),
                record.level(),
                record.target(),
                record.args()
            )
        })
        .build();

    log::set_boxed_logger(Box::new(LevelModifierLogger::new(logger, demotion_rules())))?;
    log::set_max_level(LevelFilter::Trace);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn modifier() -> LevelModifierLogger {
        let inner = env_logger::Builder::new()
            .filter_level(LevelFilter::Debug)
            .build();
        LevelModifierLogger::new(inner, demotion_rules())
    }

    #[test]
    fn noisy_debug_records_are_demoted() {
        let logger = modifier();
        assert_eq!(logger.level_for("hyper::proto", Level::Debug), Level::Trace);
        assert_eq!(logger.level_for("reqwest::connect", Level::Debug), Level::Trace);
        assert_eq!(logger.level_for("hyper::proto", Level::Warn), Level::Warn);
        assert_eq!(logger.level_for("groceries::api", Level::Debug), Level::Debug);
    }

    #[test]
    fn demoted_records_fall_below_debug_filter() {
        let logger = modifier();
        let noisy = Metadata::builder()
            .level(Level::Debug)
            .target("hyper::client")
            .build();
        let ours = Metadata::builder()
            .level(Level::Debug)
            .target("groceries::shopping")
            .build();
        assert!(!logger.enabled(&noisy));
        assert!(logger.enabled(&ours));
    }

    #[test]
    fn level_filter_parses_config_values() {
        assert_eq!(level_filter("debug"), LevelFilter::Debug);
        assert_eq!(level_filter(" WARN "), LevelFilter::Warn);
        assert_eq!(level_filter("info"), LevelFilter::Info);
        assert_eq!(level_filter("bogus"), LevelFilter::Info);
    }
}
