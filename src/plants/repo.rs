use anyhow::Context;
use sqlx::{PgPool, Postgres, Transaction};

use super::repo_types::{Issue, NewIssue, NewPlant, PlantRow, PlantSummaryRow};
use crate::db::map_insert_err;

const PLANT_COLUMNS: &str = r#"
    id, group_id, name, scientific_name, thumbnail_id, description, size, toxicity, benefits,
    care_watering, care_light, care_temperature, care_humidity, care_soil, care_fertilizing
"#;

/// Insert the plant row, its gallery and its issues within a transaction.
pub async fn insert_plant_tx(
    tx: &mut Transaction<'_, Postgres>,
    plant: &NewPlant,
) -> anyhow::Result<()> {
    let p = &plant.row;
    sqlx::query(
        r#"
        INSERT INTO plants (id, group_id, name, scientific_name, thumbnail_id, description,
                            size, toxicity, benefits, care_watering, care_light,
                            care_temperature, care_humidity, care_soil, care_fertilizing)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
        "#,
    )
    .bind(&p.id)
    .bind(&p.group_id)
    .bind(&p.name)
    .bind(&p.scientific_name)
    .bind(p.thumbnail_id.as_deref())
    .bind(&p.description)
    .bind(&p.size)
    .bind(&p.toxicity)
    .bind(&p.benefits)
    .bind(&p.care.watering)
    .bind(&p.care.light)
    .bind(&p.care.temperature)
    .bind(&p.care.humidity)
    .bind(&p.care.soil)
    .bind(&p.care.fertilizing)
    .execute(&mut **tx)
    .await
    .map_err(|e| map_insert_err(e, &p.id))
    .context("insert plant")?;

    insert_gallery_tx(tx, &p.id, &plant.image_ids).await?;
    insert_issues_tx(tx, &plant.issues).await?;
    Ok(())
}

/// Overwrite scalars and swap gallery and issues wholesale; false when the id is unknown.
pub async fn replace_plant_tx(
    tx: &mut Transaction<'_, Postgres>,
    plant: &NewPlant,
) -> anyhow::Result<bool> {
    let p = &plant.row;
    let res = sqlx::query(
        r#"
        UPDATE plants
           SET group_id = $2, name = $3, scientific_name = $4, thumbnail_id = $5,
               description = $6, size = $7, toxicity = $8, benefits = $9,
               care_watering = $10, care_light = $11, care_temperature = $12,
               care_humidity = $13, care_soil = $14, care_fertilizing = $15
         WHERE id = $1
        "#,
    )
    .bind(&p.id)
    .bind(&p.group_id)
    .bind(&p.name)
    .bind(&p.scientific_name)
    .bind(p.thumbnail_id.as_deref())
    .bind(&p.description)
    .bind(&p.size)
    .bind(&p.toxicity)
    .bind(&p.benefits)
    .bind(&p.care.watering)
    .bind(&p.care.light)
    .bind(&p.care.temperature)
    .bind(&p.care.humidity)
    .bind(&p.care.soil)
    .bind(&p.care.fertilizing)
    .execute(&mut **tx)
    .await
    .context("update plant")?;

    if res.rows_affected() == 0 {
        return Ok(false);
    }

    sqlx::query(r#"DELETE FROM plant_images WHERE plant_id = $1"#)
        .bind(&p.id)
        .execute(&mut **tx)
        .await
        .context("clear plant gallery")?;
    insert_gallery_tx(tx, &p.id, &plant.image_ids).await?;

    sqlx::query(r#"DELETE FROM plant_issues WHERE plant_id = $1"#)
        .bind(&p.id)
        .execute(&mut **tx)
        .await
        .context("clear plant issues")?;
    insert_issues_tx(tx, &plant.issues).await?;

    Ok(true)
}

async fn insert_gallery_tx(
    tx: &mut Transaction<'_, Postgres>,
    plant_id: &str,
    image_ids: &[String],
) -> anyhow::Result<()> {
    for (order, image_id) in image_ids.iter().enumerate() {
        sqlx::query(
            r#"
            INSERT INTO plant_images (plant_id, image_id, display_order)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(plant_id)
        .bind(image_id)
        .bind(order as i32)
        .execute(&mut **tx)
        .await
        .context("insert plant image")?;
    }
    Ok(())
}

async fn insert_issues_tx(
    tx: &mut Transaction<'_, Postgres>,
    issues: &[NewIssue],
) -> anyhow::Result<()> {
    for issue in issues {
        sqlx::query(
            r#"
            INSERT INTO plant_issues (plant_id, issue, solution)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(&issue.plant_id)
        .bind(&issue.issue)
        .bind(&issue.solution)
        .execute(&mut **tx)
        .await
        .context("insert plant issue")?;
    }
    Ok(())
}

pub async fn find_row(db: &PgPool, id: &str) -> anyhow::Result<Option<PlantRow>> {
    let row = sqlx::query_as::<_, PlantRow>(&format!(
        "SELECT {PLANT_COLUMNS} FROM plants WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(db)
    .await
    .context("find plant")?;
    Ok(row)
}

/// Gallery image ids in display order.
pub async fn list_image_ids(db: &PgPool, plant_id: &str) -> anyhow::Result<Vec<String>> {
    let ids: Vec<String> = sqlx::query_scalar(
        r#"
        SELECT image_id
          FROM plant_images
         WHERE plant_id = $1
         ORDER BY display_order ASC
        "#,
    )
    .bind(plant_id)
    .fetch_all(db)
    .await
    .context("list plant images")?;
    Ok(ids)
}

pub async fn list_issues(db: &PgPool, plant_id: &str) -> anyhow::Result<Vec<Issue>> {
    let rows = sqlx::query_as::<_, Issue>(
        r#"
        SELECT id, plant_id, issue, solution
          FROM plant_issues
         WHERE plant_id = $1
         ORDER BY id ASC
        "#,
    )
    .bind(plant_id)
    .fetch_all(db)
    .await
    .context("list plant issues")?;
    Ok(rows)
}

pub async fn list_summaries(db: &PgPool) -> anyhow::Result<Vec<PlantSummaryRow>> {
    let rows = sqlx::query_as::<_, PlantSummaryRow>(
        r#"SELECT id, name, scientific_name, thumbnail_id FROM plants ORDER BY id ASC"#,
    )
    .fetch_all(db)
    .await
    .context("list plants")?;
    Ok(rows)
}

pub async fn list_summaries_by_group(
    db: &PgPool,
    group_id: &str,
) -> anyhow::Result<Vec<PlantSummaryRow>> {
    let rows = sqlx::query_as::<_, PlantSummaryRow>(
        r#"
        SELECT id, name, scientific_name, thumbnail_id
          FROM plants
         WHERE group_id = $1
         ORDER BY id ASC
        "#,
    )
    .bind(group_id)
    .fetch_all(db)
    .await
    .context("list plants by group")?;
    Ok(rows)
}

pub async fn exists(db: &PgPool, id: &str) -> anyhow::Result<bool> {
    let found: bool = sqlx::query_scalar(r#"SELECT EXISTS (SELECT 1 FROM plants WHERE id = $1)"#)
        .bind(id)
        .fetch_one(db)
        .await
        .context("plant exists")?;
    Ok(found)
}

pub async fn count_in_group(db: &PgPool, group_id: &str) -> anyhow::Result<i64> {
    let n: i64 = sqlx::query_scalar(r#"SELECT COUNT(*) FROM plants WHERE group_id = $1"#)
        .bind(group_id)
        .fetch_one(db)
        .await
        .context("count plants in group")?;
    Ok(n)
}

/// Gallery rows and issues go with the plant through ON DELETE CASCADE.
pub async fn delete_by_id(db: &PgPool, id: &str) -> anyhow::Result<bool> {
    let res = sqlx::query(r#"DELETE FROM plants WHERE id = $1"#)
        .bind(id)
        .execute(db)
        .await
        .context("delete plant")?;
    Ok(res.rows_affected() > 0)
}

pub async fn delete_all(db: &PgPool) -> anyhow::Result<u64> {
    let res = sqlx::query(r#"DELETE FROM plants"#)
        .execute(db)
        .await
        .context("delete all plants")?;
    Ok(res.rows_affected())
}
