//! # Sync Configuration
//!
//! Configuration management for the sync layer.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     BODEGA_REMOTE_URL=ws://192.168.1.50:8765/ws                        │
//! │     BODEGA_WRITE_WORKERS=8                                             │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/bodega/sync.toml (Linux)                                 │
//! │     ~/Library/Application Support/com.bodega.app/sync.toml (macOS)     │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # sync.toml
//! [remote]
//! url = "ws://192.168.1.50:8765/ws"
//! connect_timeout_secs = 10
//!
//! [collections]
//! products = "productos"
//! categories = "categorias"
//! suppliers = "proveedores"
//!
//! [workers]
//! write_workers = 4
//!
//! [database]
//! path = "bodega.db"
//!
//! [hub]
//! port = 8765
//! bind_addr = "0.0.0.0"
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, info, warn};

use crate::error::{SyncError, SyncResult};
use crate::hub::DEFAULT_HUB_PORT;
use crate::workers::DEFAULT_WRITE_WORKERS;

// =============================================================================
// Remote Store Settings
// =============================================================================

/// Connection settings for the remote document store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteSettings {
    /// WebSocket URL of the remote store.
    #[serde(default = "default_remote_url")]
    pub url: String,

    /// Connection timeout (seconds).
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
}

fn default_remote_url() -> String {
    format!("ws://127.0.0.1:{}/ws", DEFAULT_HUB_PORT)
}

fn default_connect_timeout() -> u64 {
    10
}

impl Default for RemoteSettings {
    fn default() -> Self {
        RemoteSettings {
            url: default_remote_url(),
            connect_timeout_secs: default_connect_timeout(),
        }
    }
}

// =============================================================================
// Collection Names
// =============================================================================

/// Remote collection names for each entity.
///
/// The store was provisioned with Spanish collection names; they are
/// configurable so a differently-provisioned store still syncs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionSettings {
    #[serde(default = "default_products_collection")]
    pub products: String,

    #[serde(default = "default_categories_collection")]
    pub categories: String,

    #[serde(default = "default_suppliers_collection")]
    pub suppliers: String,
}

fn default_products_collection() -> String {
    "productos".to_string()
}

fn default_categories_collection() -> String {
    "categorias".to_string()
}

fn default_suppliers_collection() -> String {
    "proveedores".to_string()
}

impl Default for CollectionSettings {
    fn default() -> Self {
        CollectionSettings {
            products: default_products_collection(),
            categories: default_categories_collection(),
            suppliers: default_suppliers_collection(),
        }
    }
}

// =============================================================================
// Worker Settings
// =============================================================================

/// Write worker pool settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerSettings {
    /// Number of database write workers.
    #[serde(default = "default_write_workers")]
    pub write_workers: usize,
}

fn default_write_workers() -> usize {
    DEFAULT_WRITE_WORKERS
}

impl Default for WorkerSettings {
    fn default() -> Self {
        WorkerSettings {
            write_workers: default_write_workers(),
        }
    }
}

// =============================================================================
// Database Settings
// =============================================================================

/// Local database settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseSettings {
    /// Path to the SQLite database file.
    /// Relative paths resolve against the app data directory.
    #[serde(default = "default_db_path")]
    pub path: String,
}

fn default_db_path() -> String {
    "bodega.db".to_string()
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        DatabaseSettings {
            path: default_db_path(),
        }
    }
}

// =============================================================================
// Hub Settings
// =============================================================================

/// Settings for the local document hub (dev/test server).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HubSettings {
    /// Port for the WebSocket server.
    #[serde(default = "default_hub_port")]
    pub port: u16,

    /// Bind address (default: 0.0.0.0 for all interfaces).
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
}

fn default_hub_port() -> u16 {
    DEFAULT_HUB_PORT
}

fn default_bind_addr() -> String {
    "0.0.0.0".to_string()
}

impl Default for HubSettings {
    fn default() -> Self {
        HubSettings {
            port: default_hub_port(),
            bind_addr: default_bind_addr(),
        }
    }
}

// =============================================================================
// Main Sync Configuration
// =============================================================================

/// Complete sync configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Remote store connection.
    #[serde(default)]
    pub remote: RemoteSettings,

    /// Remote collection names.
    #[serde(default)]
    pub collections: CollectionSettings,

    /// Worker pool settings.
    #[serde(default)]
    pub workers: WorkerSettings,

    /// Local database settings.
    #[serde(default)]
    pub database: DatabaseSettings,

    /// Local hub settings.
    #[serde(default)]
    pub hub: HubSettings,
}

impl SyncConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (sync.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> SyncResult<Self> {
        let mut config = Self::default();

        // Try to load from config file
        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading sync config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        // Override with environment variables
        config.apply_env_overrides();

        // Validate the configuration
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load sync config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> SyncResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| SyncError::ConfigSaveFailed("No config path available".into()))?;

        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents)?;

        info!(?path, "Sync config saved");
        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> SyncResult<()> {
        if !self.remote.url.starts_with("ws://") && !self.remote.url.starts_with("wss://") {
            return Err(SyncError::InvalidUrl(format!(
                "Remote URL must start with ws:// or wss://, got: {}",
                self.remote.url
            )));
        }
        url::Url::parse(&self.remote.url)?;

        if self.workers.write_workers == 0 {
            return Err(SyncError::InvalidConfig(
                "write_workers must be greater than 0".into(),
            ));
        }

        if self.collections.products.is_empty()
            || self.collections.categories.is_empty()
            || self.collections.suppliers.is_empty()
        {
            return Err(SyncError::InvalidConfig(
                "collection names must not be empty".into(),
            ));
        }

        Ok(())
    }

    /// Applies environment variable overrides.
    fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var("BODEGA_REMOTE_URL") {
            debug!(url = %url, "Overriding remote URL from environment");
            self.remote.url = url;
        }

        if let Ok(workers) = std::env::var("BODEGA_WRITE_WORKERS") {
            if let Ok(n) = workers.parse::<usize>() {
                self.workers.write_workers = n;
            }
        }

        if let Ok(path) = std::env::var("BODEGA_DB_PATH") {
            debug!(path = %path, "Overriding database path from environment");
            self.database.path = path;
        }

        if let Ok(port) = std::env::var("BODEGA_HUB_PORT") {
            if let Ok(p) = port.parse::<u16>() {
                debug!(port = p, "Overriding hub port from environment");
                self.hub.port = p;
            }
        }
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "bodega", "app").map(|dirs| {
            let config_dir = dirs.config_dir();
            config_dir.join("sync.toml")
        })
    }

    /// Returns the default app data directory for the database file.
    pub fn default_data_dir() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "bodega", "app")
            .map(|dirs| dirs.data_dir().to_path_buf())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SyncConfig::default();
        assert_eq!(config.collections.products, "productos");
        assert_eq!(config.collections.categories, "categorias");
        assert_eq!(config.collections.suppliers, "proveedores");
        assert_eq!(config.workers.write_workers, DEFAULT_WRITE_WORKERS);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = SyncConfig::default();

        // Non-WebSocket URL should fail
        config.remote.url = "http://invalid".to_string();
        assert!(config.validate().is_err());

        // Valid WebSocket URL should pass
        config.remote.url = "wss://store.example.com/ws".to_string();
        assert!(config.validate().is_ok());

        // Zero workers should fail
        config.workers.write_workers = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_toml_round_trip() {
        let config = SyncConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("[remote]"));
        assert!(toml_str.contains("[collections]"));

        let parsed: SyncConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.collections.products, config.collections.products);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let parsed: SyncConfig = toml::from_str(
            r#"
            [remote]
            url = "ws://10.0.0.5:9000/ws"
            "#,
        )
        .unwrap();

        assert_eq!(parsed.remote.url, "ws://10.0.0.5:9000/ws");
        assert_eq!(parsed.collections.products, "productos");
        assert_eq!(parsed.workers.write_workers, DEFAULT_WRITE_WORKERS);
    }
}
