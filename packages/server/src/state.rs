use std::sync::Arc;

use common::BlobStore;
use sea_orm::DatabaseConnection;

use crate::config::AppConfig;

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub config: AppConfig,
    pub blob_store: Arc<dyn BlobStore>,
}

#[cfg(test)]
impl AppState {
    /// State backed by a mock database and an in-memory bucket.
    pub fn for_tests() -> Self {
        use crate::config::{
            AuthConfig, CategoryConfig, CorsConfig, DatabaseConfig, ServerConfig, StorageConfig,
        };

        Self {
            db: sea_orm::MockDatabase::new(sea_orm::DatabaseBackend::Postgres).into_connection(),
            config: AppConfig {
                server: ServerConfig {
                    host: "127.0.0.1".into(),
                    port: 0,
                    cors: CorsConfig {
                        allow_origins: vec![],
                        max_age: 60,
                    },
                },
                database: DatabaseConfig {
                    url: "postgres://unused".into(),
                },
                auth: AuthConfig {
                    jwt_secret: "unit-test-secret".into(),
                },
                storage: StorageConfig {
                    blob_dir: std::env::temp_dir(),
                    files_base_url: "http://localhost:8080/files".into(),
                    max_image_bytes: 10 * 1024 * 1024,
                    max_video_bytes: 50 * 1024 * 1024,
                },
                categories: CategoryConfig::default(),
            },
            blob_store: Arc::new(common::storage::memory::MemoryBlobStore::new()),
        }
    }
}
