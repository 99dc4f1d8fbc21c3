//! Application configuration
//!
//! Settings are layered with the `config` crate: built-in defaults, then an
//! optional `capsule.toml` (or an explicit file), then `CAPSULE_*`
//! environment variables.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Default backend base URL
pub const DEFAULT_API_URL: &str = "http://localhost:8080/";
/// Default API version prefix
pub const DEFAULT_API_VERSION: &str = "v1/";
/// Default maximum photo size in megabytes
pub const DEFAULT_MAX_PHOTO_SIZE_MB: u64 = 50;
/// Default location of the durable session store
pub const DEFAULT_STORE_PATH: &str = ".capsule/session.json";
/// Prefix for environment overrides, e.g. `CAPSULE_API_URL`
pub const ENV_PREFIX: &str = "CAPSULE";

/// Client configuration
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct AppConfig {
    /// Backend base URL (e.g., "https://api.example.com/")
    pub api_url: String,
    /// Version prefix inserted between base URL and endpoint (e.g., "v1/")
    pub api_version: String,
    /// Maximum accepted photo size in megabytes
    pub max_photo_size_mb: u64,
    /// Path of the durable session store file
    pub store_path: PathBuf,
    /// File holding the identity token minted by the identity provider
    #[serde(default)]
    pub token_file: Option<PathBuf>,
    /// Email used when signing in from the command line
    #[serde(default)]
    pub email: Option<String>,
}

impl AppConfig {
    /// Load configuration from `capsule.toml` (if present) and the environment
    ///
    /// # Environment Variables
    /// - `CAPSULE_API_URL`: Backend base URL (default: "http://localhost:8080/")
    /// - `CAPSULE_API_VERSION`: Version prefix (default: "v1/")
    /// - `CAPSULE_MAX_PHOTO_SIZE_MB`: Photo size limit (default: 50)
    /// - `CAPSULE_STORE_PATH`: Session store file (default: ".capsule/session.json")
    /// - `CAPSULE_TOKEN_FILE`: Identity token file (optional)
    /// - `CAPSULE_EMAIL`: Sign-in email (optional)
    pub fn load() -> Result<Self, ConfigError> {
        Self::build(None, Environment::with_prefix(ENV_PREFIX))
    }

    /// Load configuration from an explicit file, still honoring the environment
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::build(Some(path.as_ref()), Environment::with_prefix(ENV_PREFIX))
    }

    fn build(file: Option<&Path>, env: Environment) -> Result<Self, ConfigError> {
        let mut builder = Config::builder()
            .set_default("api_url", DEFAULT_API_URL)?
            .set_default("api_version", DEFAULT_API_VERSION)?
            .set_default("max_photo_size_mb", DEFAULT_MAX_PHOTO_SIZE_MB as i64)?
            .set_default("store_path", DEFAULT_STORE_PATH)?;

        builder = match file {
            Some(path) => {
                debug!("Loading configuration from {}", path.display());
                builder.add_source(File::from(path))
            }
            None => builder.add_source(File::with_name("capsule").required(false)),
        };

        let config: AppConfig = builder.add_source(env).build()?.try_deserialize()?;

        if config.max_photo_size_mb == 0 {
            return Err(ConfigError::Message(
                "max_photo_size_mb must be greater than zero".to_string(),
            ));
        }

        Ok(config)
    }
}
