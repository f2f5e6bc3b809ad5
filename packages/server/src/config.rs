use std::path::PathBuf;

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment, File};
use serde::Deserialize;

pub const DEFAULT_CORS_ORIGINS: &[&str] = &["http://localhost:5173", "http://localhost:3000"];

#[derive(Debug, Deserialize, Clone)]
pub struct CorsConfig {
    pub allow_origins: Vec<String>,
    pub max_age: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors: CorsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    /// Root directory of the filesystem bucket.
    pub blob_dir: PathBuf,
    /// Public prefix of media URLs, e.g. `https://api.example.com/files`.
    pub files_base_url: String,
    pub max_image_bytes: u64,
    pub max_video_bytes: u64,
}

impl StorageConfig {
    /// Largest accepted upload across all kinds.
    pub fn max_upload_bytes(&self) -> u64 {
        self.max_image_bytes.max(self.max_video_bytes)
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct CategoryConfig {
    /// Permitted category names. Empty means any name is accepted.
    pub allowed: Vec<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub storage: StorageConfig,
    #[serde(default)]
    pub categories: CategoryConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let builder = Self::defaults()?
            // Load from config/config.toml
            .add_source(File::with_name("config/config").required(false))
            // Override from environment (e.g., FOLIO__AUTH__JWT_SECRET)
            .add_source(
                Environment::with_prefix("FOLIO")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("server.cors.allow_origins")
                    .with_list_parse_key("categories.allowed"),
            );

        Self::finish(builder)
    }

    fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8080)?
            .set_default("server.cors.allow_origins", DEFAULT_CORS_ORIGINS.to_vec())?
            .set_default("server.cors.max_age", 3600)?
            .set_default("storage.blob_dir", "./data/blobs")?
            .set_default("storage.max_image_bytes", 10_i64 * 1024 * 1024)?
            .set_default("storage.max_video_bytes", 50_i64 * 1024 * 1024)?
            .set_default("categories.allowed", Vec::<String>::new())
    }

    fn finish(builder: ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
        let mut cfg: Self = builder.build()?.try_deserialize()?;

        if cfg.auth.jwt_secret.trim().is_empty() {
            return Err(ConfigError::Message("auth.jwt_secret must not be empty".into()));
        }
        if cfg.database.url.trim().is_empty() {
            return Err(ConfigError::Message("database.url must not be empty".into()));
        }
        let base = cfg.storage.files_base_url.trim().trim_end_matches('/');
        if base.is_empty() {
            return Err(ConfigError::Message(
                "storage.files_base_url must not be empty".into(),
            ));
        }
        cfg.storage.files_base_url = base.to_string();

        Ok(cfg)
    }
}
