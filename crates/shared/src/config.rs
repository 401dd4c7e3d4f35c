//! Application configuration management.

use std::path::PathBuf;

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Storage configuration (master directory and tenant stores).
    #[serde(default)]
    pub storage: StorageConfig,
    /// JWT configuration.
    pub jwt: JwtConfig,
    /// First-boot administrator account.
    #[serde(default)]
    pub bootstrap: BootstrapConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Storage configuration.
///
/// The master directory lives at `{data_dir}/master.sqlite`, tenant stores
/// under `{data_dir}/tenants/`.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Root directory for all SQLite files.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Maximum number of connections per store.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            max_connections: default_max_connections(),
        }
    }
}

impl StorageConfig {
    /// Path of the master directory store.
    #[must_use]
    pub fn master_path(&self) -> PathBuf {
        self.data_dir.join("master.sqlite")
    }

    /// Directory holding one store per tenant.
    #[must_use]
    pub fn tenants_dir(&self) -> PathBuf {
        self.data_dir.join("tenants")
    }
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_max_connections() -> u32 {
    5
}

/// JWT configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    /// Secret key for signing tokens.
    pub secret: String,
    /// Access token expiration in seconds.
    #[serde(default = "default_access_token_expiry")]
    pub access_token_expiry_secs: u64,
    /// Refresh token expiration in seconds.
    #[serde(default = "default_refresh_token_expiry")]
    pub refresh_token_expiry_secs: u64,
}

fn default_access_token_expiry() -> u64 {
    3600 // 1 hour
}

fn default_refresh_token_expiry() -> u64 {
    604_800 // 7 days
}

/// Bootstrap administrator created on first boot.
#[derive(Debug, Clone, Deserialize)]
pub struct BootstrapConfig {
    /// Username of the system administrator.
    #[serde(default = "default_admin_username")]
    pub admin_username: String,
    /// Initial password of the system administrator.
    #[serde(default = "default_admin_password")]
    pub admin_password: String,
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            admin_username: default_admin_username(),
            admin_password: default_admin_password(),
        }
    }
}

fn default_admin_username() -> String {
    "admin".to_string()
}

fn default_admin_password() -> String {
    "admin123".to_string()
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("ILTIZAM").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
