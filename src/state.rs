//! Application state management
//!
//! The state only carries configuration. Every query rescans the metadata
//! directory, so nothing is shared between requests beyond these settings.

use crate::config::{IndexConfig, ServerConfig};

/// Shared application state
#[derive(Debug, Clone)]
pub struct AppState {
    pub config: ServerConfig,
}

impl AppState {
    /// Create a new AppState with the given configuration
    pub fn new(config: ServerConfig) -> Self {
        Self { config }
    }

    /// Create AppState with default configuration
    pub fn with_defaults() -> Self {
        Self::new(ServerConfig::default())
    }

    /// Metadata index settings
    pub fn index_config(&self) -> &IndexConfig {
        &self.config.index
    }
}
