use std::path::{Path, PathBuf};

use tracing_appender::rolling::RollingFileAppender;
use tracing_subscriber::{EnvFilter, Registry, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initializes `tracing` logging with options from the environment variable
/// given in the `env` parameter.
///
/// If the environment variable is not set (or invalid), the maximum log level is set to INFO.
/// Log output goes to stderr, since stdout carries the merged document.
///
/// Log output can be copied to a file by setting `{env}_DIRECTORY` (e.g. `CONFIG_MERGE_LOG_DIRECTORY`)
/// to a directory path. This file will be rotated regularly.
pub fn initialize_logging(env: &str, app_name: &str) {
    let log_directory = std::env::var_os(format!("{env}_DIRECTORY")).map(PathBuf::from);
    let file_layer = log_directory
        .as_deref()
        .and_then(|dir| file_appender(dir, app_name))
        .map(|appender| fmt::layer().with_ansi(false).with_writer(appender));

    let registry = Registry::default()
        .with(log_filter(env))
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(file_layer);
    // A subscriber may already be installed (for example by tests)
    let _ = registry.try_init();

    match log_directory {
        Some(dir) => tracing::info!(directory = %dir.display(), "file logging enabled"),
        None => tracing::debug!("file logging disabled, because no log directory set"),
    }
}

fn log_filter(env: &str) -> EnvFilter {
    EnvFilter::try_from_env(env)
        .unwrap_or_else(|_| EnvFilter::new(tracing::Level::INFO.to_string()))
}

fn file_appender(dir: &Path, app_name: &str) -> Option<RollingFileAppender> {
    RollingFileAppender::builder()
        .filename_suffix(format!("{app_name}.log"))
        .max_log_files(6)
        .build(dir)
        // tracing is not initialized yet
        .inspect_err(|err| eprintln!("failed to initialize rolling file appender: {err}"))
        .ok()
}
