use std::path::PathBuf;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    pub staging_root: PathBuf,
    pub archive_root: PathBuf,
    pub rejected_root: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ScreeningConfig {
    /// Claims older than this are force-released by the reaper.
    pub claim_ttl_hours: i64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub storage: StorageConfig,
    pub screening: ScreeningConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let s = Config::builder()
            .set_default("storage.staging_root", "./data/staging")?
            .set_default("storage.archive_root", "./data/archive")?
            .set_default("storage.rejected_root", "./data/rejected")?
            .set_default("screening.claim_ttl_hours", 48)?
            // Load from config/config.toml
            .add_source(File::with_name("config/config").required(false))
            // Override from environment (e.g., TRACKVAULT__DATABASE__URL)
            .add_source(Environment::with_prefix("TRACKVAULT").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
