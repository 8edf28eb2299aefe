// Configuration types module
// Defines all configuration-related data structures

use serde::{Deserialize, Serialize};

/// Main configuration structure
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub http: HttpConfig,
}

/// Server configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Number of worker threads, each running its own reactor
    pub workers: usize,
    /// Directory served by the demo binary
    pub static_dir: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            workers: DEFAULT_WORKERS,
            static_dir: "static".to_string(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    /// Output format (compact, pretty, json)
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Compact,
    Pretty,
    Json,
}

/// HTTP rendering configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct HttpConfig {
    pub server_name: String,
    pub send_server_header: bool,
    pub send_date_header: bool,
    /// Hand large files to the transport instead of buffering them
    pub use_sendfile: bool,
    /// Files strictly larger than this many bytes use direct transfer
    pub sendfile_threshold: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            server_name: default_server_name(),
            send_server_header: true,
            send_date_header: true,
            use_sendfile: true,
            sendfile_threshold: DEFAULT_SENDFILE_THRESHOLD,
        }
    }
}

pub const DEFAULT_WORKERS: usize = 4;
pub const DEFAULT_SENDFILE_THRESHOLD: u64 = 200 * 1024;

pub fn default_server_name() -> String {
    format!("rust_http_response/{}", env!("CARGO_PKG_VERSION"))
}
