// Configuration module entry point
// Loads the immutable configuration shared by every worker

mod types;

pub use types::{
    default_server_name, Config, HttpConfig, LogFormat, LoggingConfig, ServerConfig,
    DEFAULT_SENDFILE_THRESHOLD, DEFAULT_WORKERS,
};

use std::net::SocketAddr;

impl Config {
    /// Load configuration from the default path ("config", any supported extension)
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration from specified file path (without extension)
    ///
    /// The file is optional; environment variables prefixed with `RESPONSE`
    /// override it (`RESPONSE_HTTP__SEND_DATE_HEADER=false`).
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let threshold = i64::try_from(DEFAULT_SENDFILE_THRESHOLD).unwrap_or(i64::MAX);
        let workers = i64::try_from(DEFAULT_WORKERS).unwrap_or(1);

        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix("RESPONSE")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080)?
            .set_default("server.workers", workers)?
            .set_default("server.static_dir", "static")?
            .set_default("logging.level", "info")?
            .set_default("logging.format", "compact")?
            .set_default("http.server_name", default_server_name())?
            .set_default("http.send_server_header", true)?
            .set_default("http.send_date_header", true)?
            .set_default("http.use_sendfile", true)?
            .set_default("http.sendfile_threshold", threshold)?
            .build()?;

        settings.try_deserialize()
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }

    /// Number of worker threads that own a cached not-found page
    pub const fn thread_num(&self) -> usize {
        self.server.workers
    }

    /// Precomputed `Server` header line, or empty when the banner is disabled
    pub fn server_header_line(&self) -> String {
        if self.http.send_server_header {
            format!("Server: {}\r\n", self.http.server_name)
        } else {
            String::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_without_file() {
        let cfg = Config::load_from("definitely/not/a/config/file").unwrap();
        assert_eq!(cfg.server.workers, DEFAULT_WORKERS);
        assert_eq!(cfg.http.sendfile_threshold, 200 * 1024);
        assert!(cfg.http.send_date_header);
        assert!(cfg.http.use_sendfile);
        assert_eq!(cfg.logging.format, LogFormat::Compact);
    }

    #[test]
    fn test_load_from_toml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("response.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            "[server]\nworkers = 2\n\n[http]\nsend_server_header = false\nsendfile_threshold = 1024\n\n[logging]\nformat = \"json\""
        )
        .unwrap();

        let stem = dir.path().join("response");
        let cfg = Config::load_from(stem.to_str().unwrap()).unwrap();
        assert_eq!(cfg.thread_num(), 2);
        assert!(!cfg.http.send_server_header);
        assert_eq!(cfg.http.sendfile_threshold, 1024);
        assert_eq!(cfg.logging.format, LogFormat::Json);
        assert_eq!(cfg.server_header_line(), "");
    }

    #[test]
    fn test_server_header_line() {
        let mut cfg = Config::default();
        cfg.http.server_name = "unit".to_string();
        assert_eq!(cfg.server_header_line(), "Server: unit\r\n");
    }

    #[test]
    fn test_socket_addr() {
        let cfg = Config::default();
        assert_eq!(cfg.get_socket_addr().unwrap().port(), 8080);
    }
}
