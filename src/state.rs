use crate::config::{AppConfig, StoreKind};
use crate::store::{CatalogStore, MemoryStore, PgStore};
#[cfg(test)]
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: Arc<dyn CatalogStore>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);

        let store = match config.store {
            StoreKind::Postgres => {
                let db = crate::db::connect(&config).await?;
                Arc::new(PgStore::new(db)) as Arc<dyn CatalogStore>
            }
            StoreKind::Memory => {
                tracing::warn!("using in-memory catalog store; data is lost on restart");
                Arc::new(MemoryStore::new()) as Arc<dyn CatalogStore>
            }
        };

        Ok(Self { config, store })
    }

    /// Memory-backed state reading fixtures from the bundled `seed-data/`.
    #[cfg(test)]
    pub fn fake() -> Self {
        Self::fake_with_seed_dir(PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("seed-data"))
    }

    #[cfg(test)]
    pub fn fake_with_seed_dir(seed_dir: PathBuf) -> Self {
        let config = Arc::new(AppConfig {
            store: StoreKind::Memory,
            database_url: None,
            db_max_connections: 1,
            seed_dir,
            max_upload_bytes: 1024 * 1024,
        });
        Self {
            config,
            store: Arc::new(MemoryStore::new()),
        }
    }
}
