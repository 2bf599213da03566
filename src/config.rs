//! Server configuration

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Metadata index configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexConfig {
    /// Directory the recorder writes `.meta` sidecar files into
    pub meta_dir: PathBuf,

    /// Metadata file extension, without the leading dot
    pub meta_extension: String,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            meta_dir: PathBuf::from("./nvr/m3u8"),
            meta_extension: "meta".to_string(),
        }
    }
}

impl IndexConfig {
    /// Get the file name suffix metadata files end with (e.g. `.meta`)
    pub fn suffix(&self) -> String {
        format!(".{}", self.meta_extension.trim_start_matches('.'))
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind to
    pub host: String,

    /// Port to listen on
    pub port: u16,

    /// Enable CORS
    pub cors_enabled: bool,

    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,

    /// Metadata index configuration
    pub index: IndexConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            cors_enabled: true,
            log_level: "info".to_string(),
            index: IndexConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Get the socket address string
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let content = std::fs::read_to_string(path)?;
        let config: ServerConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn to_file(&self, path: &str) -> Result<(), Box<dyn std::error::Error>> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
