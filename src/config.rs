use std::path::PathBuf;

use anyhow::Context;
use serde::Deserialize;

/// Which `CatalogStore` backs the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreKind {
    Postgres,
    Memory,
}

impl std::str::FromStr for StoreKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "pg" => Ok(StoreKind::Postgres),
            "memory" | "mem" => Ok(StoreKind::Memory),
            other => anyhow::bail!("unknown CATALOG_STORE '{other}' (expected postgres|memory)"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub store: StoreKind,
    pub database_url: Option<String>,
    pub db_max_connections: u32,
    pub seed_dir: PathBuf,
    pub max_upload_bytes: usize,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let store = match std::env::var("CATALOG_STORE") {
            Ok(v) => v.parse::<StoreKind>()?,
            Err(_) => StoreKind::Postgres,
        };
        let database_url = std::env::var("DATABASE_URL").ok();
        if store == StoreKind::Postgres && database_url.is_none() {
            anyhow::bail!("DATABASE_URL is required when CATALOG_STORE=postgres");
        }
        let db_max_connections = parse_env("DB_MAX_CONNECTIONS", 10)?;
        let max_upload_bytes = parse_env("MAX_UPLOAD_BYTES", 10 * 1024 * 1024)?;
        let seed_dir = std::env::var("SEED_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("seed-data"));

        Ok(Self {
            store,
            database_url,
            db_max_connections,
            seed_dir,
            max_upload_bytes,
        })
    }
}

fn parse_env<T>(name: &str, default: T) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(name) {
        Ok(v) => v
            .trim()
            .parse::<T>()
            .with_context(|| format!("invalid value for {name}: '{v}'")),
        Err(_) => Ok(default),
    }
}
