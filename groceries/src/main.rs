// This file is part of the product Groceries.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use actix_web::rt::System;
use actix_web::{App, HttpServer, middleware::Logger, web};
use log::info;
use std::path::PathBuf;

use groceries::app_state::AppState;
use groceries::bootstrap::{self, BootstrapResult};
use groceries::config::{EnvOverrides, ValidatedConfig};
use groceries::runtime_paths::RuntimePaths;
use groceries::{api, frontend, util};

fn main() {
    let exit_code = run();
    std::process::exit(exit_code);
}

fn run() -> i32 {
    let parsed_args = match parse_args() {
        Ok(args) => args,
        Err(error) => {
            eprintln!("❌ Invalid command line arguments: {}", error);
            eprintln!("❌ Use -C <root> to set the runtime directory.");
            return 1;
        }
    };

    if matches!(parsed_args.mode, RunMode::Help) {
        print!("{}", help_text());
        return 0;
    }

    let bootstrap =
        match bootstrap::bootstrap_runtime(&parsed_args.runtime_root, &EnvOverrides::from_env()) {
            Ok(result) => result,
            Err(error) => {
                eprintln!("❌ Bootstrap error: {}", error);
                eprintln!("❌ Application cannot start with invalid configuration.");
                return 1;
            }
        };

    if let Err(error) = util::init_logging(&bootstrap.validated_config.logging.level) {
        eprintln!("❌ Failed to initialize logger: {}", error);
        return 1;
    }

    let result = match parsed_args.mode {
        RunMode::Reindex => System::new().block_on(run_reindex(bootstrap)),
        _ => System::new().block_on(run_server(bootstrap)),
    };
    match result {
        Ok(()) => 0,
        Err(error) => {
            eprintln!("❌ {}", error);
            1
        }
    }
}

async fn open_state(
    config: &ValidatedConfig,
    runtime_paths: RuntimePaths,
) -> std::io::Result<AppState> {
    AppState::open(config, runtime_paths)
        .await
        .map_err(|error| std::io::Error::other(format!("Failed to open shopping store: {}", error)))
}

async fn run_reindex(bootstrap: BootstrapResult) -> std::io::Result<()> {
    let state = open_state(&bootstrap.validated_config, bootstrap.runtime_paths).await?;
    let pushed = state
        .store
        .rebuild_index()
        .await
        .map_err(|error| std::io::Error::other(format!("Reindex failed: {}", error)))?;
    println!("Reindexed {} catalog item(s)", pushed);
    Ok(())
}

async fn run_server(bootstrap: BootstrapResult) -> std::io::Result<()> {
    let validated_config = bootstrap.validated_config;
    log_startup_info(&validated_config, &bootstrap.runtime_paths);

    let frontend_dir = frontend::frontend_dir(&validated_config, &bootstrap.runtime_paths);
    match &frontend_dir {
        Some(dir) => info!("Serving frontend from {}", dir.display()),
        None => info!("Frontend not served"),
    }

    let state = web::Data::new(open_state(&validated_config, bootstrap.runtime_paths).await?);
    info!("Snapshot file: {}", state.runtime_paths.db_file.display());

    let factory = move || {
        let frontend_dir = frontend_dir.clone();
        App::new()
            .app_data(state.clone())
            .wrap(Logger::new(
                r#"%a "%r" %s %b "%{Referer}i" "%{User-Agent}i" %T"#,
            ))
            .configure(api::configure)
            .configure(move |cfg| frontend::configure(cfg, frontend_dir.as_deref()))
    };

    HttpServer::new(factory)
        .workers(validated_config.server.workers)
        .bind(validated_config.bind_address())?
        .run()
        .await
}

fn log_startup_info(config: &ValidatedConfig, runtime_paths: &RuntimePaths) {
    info!("Starting groceries {}", env!("CARGO_PKG_VERSION"));
    info!("Workers: {}", config.server.workers);
    info!(
        "Listening on http://{}:{}",
        config.server.host, config.server.port
    );
    if config.dev_mode {
        info!("Development mode enabled");
    }
    info!("Config file: {}", runtime_paths.config_file.display());
    info!("Data directory: {}", runtime_paths.data_dir.display());
    info!("Runtime root: {}", runtime_paths.root.display());
}

#[derive(Debug, PartialEq, Eq)]
enum RunMode {
    Serve,
    Reindex,
    Help,
}

struct ParsedArgs {
    runtime_root: PathBuf,
    mode: RunMode,
}

fn help_text() -> String {
    [
        "Usage:",
        "  groceries [options]            Run the shopping list server.",
        "  groceries [options] reindex    Rebuild the search index from the saved catalogs.",
        "  groceries help",
        "",
        "Options:",
        "  -C <root>   Set the runtime root (default: .).",
        "  -h, --help  Show this help.",
        "",
        "Environment:",
        "  MEILI_URL   Search engine URL (overrides search.url).",
        "  MEILI_KEY   Search engine API key (overrides search.api_key).",
        "  DEV         When set, enables dev_mode.",
        "  RUST_LOG    Refines the configured log level.",
        "",
    ]
    .join("\n")
}

fn parse_args() -> Result<ParsedArgs, String> {
    parse_args_from(std::env::args().skip(1))
}

fn parse_args_from<I>(args: I) -> Result<ParsedArgs, String>
where
    I: IntoIterator<Item = String>,
{
    let args: Vec<String> = args.into_iter().collect();
    if args.iter().any(|arg| is_help_flag(arg)) {
        return Ok(ParsedArgs {
            runtime_root: PathBuf::from("."),
            mode: RunMode::Help,
        });
    }

    let mut args = args.into_iter();
    let mut runtime_root = PathBuf::from(".");
    let mut commands = Vec::new();

    while let Some(arg) = args.next() {
        if arg == "--" {
            continue;
        } else if arg == "-C" {
            let value = args
                .next()
                .ok_or_else(|| "Missing value for -C".to_string())?;
            runtime_root = PathBuf::from(value);
        } else {
            commands.push(arg);
        }
    }

    let mode = match commands.as_slice() {
        [] => RunMode::Serve,
        [command] if command.eq_ignore_ascii_case("help") => RunMode::Help,
        [command] if command.eq_ignore_ascii_case("reindex") => RunMode::Reindex,
        _ => return Err(format!("Unknown command: {}", commands.join(" "))),
    };

    let runtime_root = make_runtime_root_absolute(runtime_root)?;
    Ok(ParsedArgs { runtime_root, mode })
}

fn is_help_flag(arg: &str) -> bool {
    arg == "-h" || arg == "--help"
}

fn make_runtime_root_absolute(runtime_root: PathBuf) -> Result<PathBuf, String> {
    if runtime_root.is_absolute() {
        return Ok(runtime_root);
    }

    let current_dir = std::env::current_dir()
        .map_err(|error| format!("Failed to resolve current directory: {}", error))?;
    Ok(current_dir.join(runtime_root))
}
