use anyhow::Context;
use sqlx::{PgPool, Postgres, Transaction};

use super::repo_types::PlantGroup;
use crate::db::map_insert_err;

pub async fn insert_group_tx(
    tx: &mut Transaction<'_, Postgres>,
    group: &PlantGroup,
) -> anyhow::Result<()> {
    sqlx::query(
        r#"
        INSERT INTO plant_groups (id, name, image_id)
        VALUES ($1, $2, $3)
        "#,
    )
    .bind(&group.id)
    .bind(&group.name)
    .bind(group.image_id.as_deref())
    .execute(&mut **tx)
    .await
    .map_err(|e| map_insert_err(e, &group.id))
    .context("insert plant group")?;

    Ok(())
}

pub async fn find_by_id(db: &PgPool, id: &str) -> anyhow::Result<Option<PlantGroup>> {
    let row = sqlx::query_as::<_, PlantGroup>(
        r#"SELECT id, name, image_id FROM plant_groups WHERE id = $1"#,
    )
    .bind(id)
    .fetch_optional(db)
    .await
    .context("find plant group")?;
    Ok(row)
}

pub async fn list_all(db: &PgPool) -> anyhow::Result<Vec<PlantGroup>> {
    let rows = sqlx::query_as::<_, PlantGroup>(
        r#"SELECT id, name, image_id FROM plant_groups ORDER BY id ASC"#,
    )
    .fetch_all(db)
    .await
    .context("list plant groups")?;
    Ok(rows)
}

pub async fn exists(db: &PgPool, id: &str) -> anyhow::Result<bool> {
    let found: bool =
        sqlx::query_scalar(r#"SELECT EXISTS (SELECT 1 FROM plant_groups WHERE id = $1)"#)
            .bind(id)
            .fetch_one(db)
            .await
            .context("plant group exists")?;
    Ok(found)
}

/// Overwrite name and image reference; false when the id is unknown.
pub async fn update(db: &PgPool, group: &PlantGroup) -> anyhow::Result<bool> {
    let res = sqlx::query(r#"UPDATE plant_groups SET name = $2, image_id = $3 WHERE id = $1"#)
        .bind(&group.id)
        .bind(&group.name)
        .bind(group.image_id.as_deref())
        .execute(db)
        .await
        .context("update plant group")?;
    Ok(res.rows_affected() > 0)
}

pub async fn delete_by_id(db: &PgPool, id: &str) -> anyhow::Result<bool> {
    let res = sqlx::query(r#"DELETE FROM plant_groups WHERE id = $1"#)
        .bind(id)
        .execute(db)
        .await
        .context("delete plant group")?;
    Ok(res.rows_affected() > 0)
}

pub async fn delete_all(db: &PgPool) -> anyhow::Result<u64> {
    let res = sqlx::query(r#"DELETE FROM plant_groups"#)
        .execute(db)
        .await
        .context("delete all plant groups")?;
    Ok(res.rows_affected())
}
