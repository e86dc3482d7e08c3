use anyhow::Context;
use sqlx::{PgPool, Postgres, Transaction};

use super::repo_types::{Image, ImageMeta};
use crate::db::map_insert_err;

/// Insert one image row within a transaction.
pub async fn insert_image_tx(
    tx: &mut Transaction<'_, Postgres>,
    image: &Image,
) -> anyhow::Result<()> {
    sqlx::query(
        r#"
        INSERT INTO images (id, filename, content_type, bytes, created_date)
        VALUES ($1, $2, $3, $4, $5)
        "#,
    )
    .bind(&image.id)
    .bind(&image.filename)
    .bind(&image.content_type)
    .bind(&image.bytes)
    .bind(image.created_date)
    .execute(&mut **tx)
    .await
    .map_err(|e| map_insert_err(e, &image.id))
    .context("insert image")?;

    Ok(())
}

pub async fn find_by_id(db: &PgPool, id: &str) -> anyhow::Result<Option<Image>> {
    let row = sqlx::query_as::<_, Image>(
        r#"
        SELECT id, filename, content_type, bytes, created_date
          FROM images
         WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(db)
    .await
    .context("find image")?;

    Ok(row)
}

/// Metadata for every image, oldest first.
pub async fn list_meta(db: &PgPool) -> anyhow::Result<Vec<ImageMeta>> {
    let rows = sqlx::query_as::<_, ImageMeta>(
        r#"
        SELECT id, filename, content_type, created_date
          FROM images
         ORDER BY created_date ASC, id ASC
        "#,
    )
    .fetch_all(db)
    .await
    .context("list images")?;

    Ok(rows)
}

pub async fn exists(db: &PgPool, id: &str) -> anyhow::Result<bool> {
    let found: bool = sqlx::query_scalar(r#"SELECT EXISTS (SELECT 1 FROM images WHERE id = $1)"#)
        .bind(id)
        .fetch_one(db)
        .await
        .context("image exists")?;
    Ok(found)
}

pub async fn delete_by_id(db: &PgPool, id: &str) -> anyhow::Result<bool> {
    let res = sqlx::query(r#"DELETE FROM images WHERE id = $1"#)
        .bind(id)
        .execute(db)
        .await
        .context("delete image")?;
    Ok(res.rows_affected() > 0)
}

pub async fn delete_all(db: &PgPool) -> anyhow::Result<u64> {
    let res = sqlx::query(r#"DELETE FROM images"#)
        .execute(db)
        .await
        .context("delete all images")?;
    Ok(res.rows_affected())
}
