use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{config::AppConfig, store::DuplicateKey};

pub async fn connect(config: &AppConfig) -> anyhow::Result<PgPool> {
    let url = config
        .database_url
        .as_deref()
        .context("DATABASE_URL is not set")?;
    let db = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .connect(url)
        .await
        .context("connect to database")?;

    sqlx::migrate!("./migrations")
        .run(&db)
        .await
        .context("run migrations")?;

    Ok(db)
}

/// Unique violations become `DuplicateKey` so services can answer 409.
pub(crate) fn map_insert_err(e: sqlx::Error, key: &str) -> anyhow::Error {
    match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            DuplicateKey(key.to_string()).into()
        }
        _ => anyhow::Error::new(e),
    }
}
