use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Server configuration.
///
/// Constructed once at startup and passed into the store and HTTP layer;
/// there is no ambient global configuration state.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Server bind address
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Root directory holding project contents and upload staging
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Maximum upload size in MB
    #[serde(default = "default_max_upload_size_mb")]
    pub max_upload_size_mb: usize,

    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            port: default_port(),
            data_dir: default_data_dir(),
            timeout_secs: default_timeout_secs(),
            max_upload_size_mb: default_max_upload_size_mb(),
            log_level: default_log_level(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables and config files
    pub fn load() -> anyhow::Result<Self> {
        // Pick up a local .env file when present
        let _ = dotenvy::dotenv();

        let builder = config::Config::builder()
            // Load from file if exists
            .add_source(config::File::with_name("docbay").required(false))
            // Override with environment variables
            .add_source(config::Environment::with_prefix("DOCBAY").separator("__"));

        let config: Config = builder.build()?.try_deserialize()?;
        Ok(config)
    }

    /// Get the socket address to bind to
    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        let addr_str = format!("{}:{}", self.bind_addr, self.port);
        Ok(addr_str.parse()?)
    }

    /// Get request timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Get max upload size in bytes
    pub fn max_upload_size(&self) -> usize {
        self.max_upload_size_mb * 1024 * 1024
    }

    /// Directory holding one subdirectory per project
    pub fn project_dir(&self) -> PathBuf {
        self.data_dir.join("proj")
    }

    /// Directory holding transient upload staging files
    pub fn temp_dir(&self) -> PathBuf {
        self.data_dir.join("tmp")
    }
}

fn default_bind_addr() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("_docbay")
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_max_upload_size_mb() -> usize {
    256
}

fn default_log_level() -> String {
    "info".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let cfg = Config::default();
        assert_eq!(cfg.port, 3000);
        assert_eq!(cfg.timeout_secs, 30);
        assert_eq!(cfg.max_upload_size_mb, 256);
        assert_eq!(cfg.data_dir, PathBuf::from("_docbay"));
    }

    #[test]
    fn test_derived_directories() {
        let cfg = Config::default();
        assert_eq!(cfg.project_dir(), PathBuf::from("_docbay/proj"));
        assert_eq!(cfg.temp_dir(), PathBuf::from("_docbay/tmp"));
    }

    #[test]
    fn test_socket_addr() {
        let cfg = Config::default();
        let addr = cfg.socket_addr().unwrap();
        assert_eq!(addr.port(), 3000);
    }
}
