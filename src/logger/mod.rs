//! Logger module
//!
//! Provides logging utilities for the response layer including:
//! - Subscriber initialisation from configuration
//! - File response diagnostics (missing files, direct transfer, stat failures)
//! - Payload diagnostics (malformed JSON bodies)
//! - Worker and server lifecycle logging

use std::net::SocketAddr;
use std::path::Path;

use tracing_subscriber::EnvFilter;

use crate::config::{Config, LogFormat, LoggingConfig};
use crate::error::{ResponseError, Result};

/// Initialize the global subscriber with configuration
///
/// Should be called once at application startup. `RUST_LOG` takes precedence
/// over `logging.level` when set.
pub fn init(config: &LoggingConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .map_err(|e| ResponseError::Logger(e.to_string()))?;

    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_thread_names(true);
    let installed = match config.format {
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
    installed.map_err(|e| ResponseError::Logger(e.to_string()))
}

pub fn log_server_start(addr: &SocketAddr, config: &Config) {
    tracing::info!(
        %addr,
        workers = config.server.workers,
        static_dir = %config.server.static_dir,
        sendfile = config.http.use_sendfile,
        sendfile_threshold = config.http.sendfile_threshold,
        "server started"
    );
}

pub fn log_worker_started(index: usize) {
    tracing::debug!(worker = index, "worker reactor running");
}

pub fn log_worker_failed(err: &std::io::Error) {
    tracing::error!(error = %err, "worker stopped");
}

pub fn log_connection_error(err: &impl std::fmt::Display) {
    tracing::error!(error = %err, "failed to serve connection");
}

pub fn log_file_open_failed(path: &Path, err: &std::io::Error) {
    tracing::debug!(path = %path.display(), error = %err, "file response degraded to not found");
}

pub fn log_sendfile_selected(path: &Path, size: u64) {
    tracing::trace!(path = %path.display(), size, "using direct transfer");
}

pub fn log_stat_failed(path: &Path, err: &std::io::Error) {
    tracing::error!(path = %path.display(), error = %err, "stat error on transfer file");
}

pub fn log_json_parse_failed(err: &serde_json::Error, body: &[u8]) {
    tracing::error!(
        error = %err,
        body = %String::from_utf8_lossy(body),
        "response body is not valid JSON"
    );
}

pub fn log_json_write_failed(err: &serde_json::Error) {
    tracing::error!(error = %err, "failed to serialize JSON payload");
}

pub fn log_cached_not_found(worker: usize) {
    tracing::trace!(worker, "use cached 404 response");
}

pub fn log_missing_view(name: &str) {
    tracing::warn!(view = name, "view not found");
}

pub fn log_warning(message: &str) {
    tracing::warn!("{message}");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_fails_without_panicking() {
        let cfg = LoggingConfig::default();
        let _ = init(&cfg);
        assert!(init(&cfg).is_err());
    }
}
