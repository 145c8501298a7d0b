// src/main.rs

//! The main entry point for the cacheflush command-line tool.

use anyhow::Result;
use cacheflush::config::Config;
use cacheflush::core::dispatcher::Dispatcher;
use cacheflush::core::template::Mode;
use cacheflush::core::transport::HttpTransport;
use std::env;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::filter::EnvFilter;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Define version information.
    const VERSION: &str = env!("CARGO_PKG_VERSION");

    let args: Vec<String> = env::args().collect();

    // Handle the --version flag.
    if args.contains(&"--version".to_string()) {
        println!("cacheflush version {VERSION}");
        return Ok(ExitCode::SUCCESS);
    }

    // Determine the configuration path. It can be provided via a --config
    // flag; otherwise, it defaults to "cacheflush.toml".
    let config_path = args
        .iter()
        .position(|arg| arg == "--config")
        .and_then(|i| args.get(i + 1))
        .map(|s| s.as_str())
        .unwrap_or("cacheflush.toml");

    // The remaining positional arguments select the operation and the path.
    let mut positional = Vec::new();
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--config" => i += 2,
            arg => {
                positional.push(arg.to_string());
                i += 1;
            }
        }
    }

    let (mode, path) = match positional.as_slice() {
        [operation, path] => {
            let mode = match operation.as_str() {
                "refresh" => Mode::Refresh,
                "purge" => Mode::Purge,
                other => {
                    eprintln!("Unknown operation '{other}', expected 'refresh' or 'purge'");
                    return Ok(ExitCode::FAILURE);
                }
            };
            (mode, path.as_str())
        }
        _ => {
            eprintln!("Usage: cacheflush [--config /path/to/cacheflush.toml] <refresh|purge> <path>");
            return Ok(ExitCode::FAILURE);
        }
    };

    // Load the configuration. Without a valid endpoint set there is nothing
    // useful this tool can do.
    let config = match Config::from_file(config_path) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Failed to load configuration from \"{config_path}\": {e:#}");
            return Ok(ExitCode::FAILURE);
        }
    };

    // Initial log level comes from the environment, falling back to the config.
    let log_level = env::var("RUST_LOG").unwrap_or_else(|_| config.log_level.clone());
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(log_level))
        .compact()
        .with_ansi(true)
        .init();

    // One configured dispatcher exists for the process lifetime.
    let transport = Arc::new(HttpTransport::new()?);
    let dispatcher = Dispatcher::new(
        config.endpoints.clone(),
        config.policy(),
        config.default_mode,
        config.timeout,
        transport,
    )?;

    let batch = dispatcher.invalidate(path, Some(mode)).await?;

    if batch.all_succeeded {
        info!(
            path,
            endpoints = batch.outcomes.len(),
            "all cache servers notified"
        );
        Ok(ExitCode::SUCCESS)
    } else {
        let failed = batch.outcomes.iter().filter(|o| !o.succeeded).count();
        error!(
            path,
            failed,
            endpoints = batch.outcomes.len(),
            "some cache servers could not be notified"
        );
        // Partial failure is reported via the exit code so callers can decide
        // policy; the library itself never fails the invalidation for it.
        Ok(ExitCode::from(2))
    }
}
