use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;

use super::CatalogStore;
use crate::{
    groups::{repo as group_repo, repo_types::PlantGroup},
    images::{
        repo as image_repo,
        repo_types::{Image, ImageMeta},
    },
    plants::{
        repo as plant_repo,
        repo_types::{NewPlant, PlantDetail, PlantSummaryRow},
    },
};

#[derive(Clone)]
pub struct PgStore {
    db: PgPool,
}

impl PgStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CatalogStore for PgStore {
    async fn insert_images(&self, images: &[Image]) -> anyhow::Result<()> {
        let mut tx = self.db.begin().await.context("begin tx")?;
        for image in images {
            image_repo::insert_image_tx(&mut tx, image).await?;
        }
        tx.commit().await.context("commit tx")?;
        Ok(())
    }

    async fn find_image(&self, id: &str) -> anyhow::Result<Option<Image>> {
        image_repo::find_by_id(&self.db, id).await
    }

    async fn list_images(&self) -> anyhow::Result<Vec<ImageMeta>> {
        image_repo::list_meta(&self.db).await
    }

    async fn image_exists(&self, id: &str) -> anyhow::Result<bool> {
        image_repo::exists(&self.db, id).await
    }

    async fn delete_image(&self, id: &str) -> anyhow::Result<bool> {
        image_repo::delete_by_id(&self.db, id).await
    }

    async fn delete_all_images(&self) -> anyhow::Result<u64> {
        image_repo::delete_all(&self.db).await
    }

    async fn insert_groups(&self, groups: &[PlantGroup]) -> anyhow::Result<()> {
        let mut tx = self.db.begin().await.context("begin tx")?;
        for group in groups {
            group_repo::insert_group_tx(&mut tx, group).await?;
        }
        tx.commit().await.context("commit tx")?;
        Ok(())
    }

    async fn find_group(&self, id: &str) -> anyhow::Result<Option<PlantGroup>> {
        group_repo::find_by_id(&self.db, id).await
    }

    async fn list_groups(&self) -> anyhow::Result<Vec<PlantGroup>> {
        group_repo::list_all(&self.db).await
    }

    async fn group_exists(&self, id: &str) -> anyhow::Result<bool> {
        group_repo::exists(&self.db, id).await
    }

    async fn update_group(&self, group: &PlantGroup) -> anyhow::Result<bool> {
        group_repo::update(&self.db, group).await
    }

    async fn delete_group(&self, id: &str) -> anyhow::Result<bool> {
        group_repo::delete_by_id(&self.db, id).await
    }

    async fn delete_all_groups(&self) -> anyhow::Result<u64> {
        group_repo::delete_all(&self.db).await
    }

    async fn insert_plants(&self, plants: &[NewPlant]) -> anyhow::Result<()> {
        let mut tx = self.db.begin().await.context("begin tx")?;
        for plant in plants {
            plant_repo::insert_plant_tx(&mut tx, plant).await?;
        }
        tx.commit().await.context("commit tx")?;
        Ok(())
    }

    async fn replace_plant(&self, plant: &NewPlant) -> anyhow::Result<bool> {
        let mut tx = self.db.begin().await.context("begin tx")?;
        if !plant_repo::replace_plant_tx(&mut tx, plant).await? {
            tx.rollback().await.context("rollback tx")?;
            return Ok(false);
        }
        tx.commit().await.context("commit tx")?;
        Ok(true)
    }

    async fn find_plant(&self, id: &str) -> anyhow::Result<Option<PlantDetail>> {
        let Some(row) = plant_repo::find_row(&self.db, id).await? else {
            return Ok(None);
        };
        let image_ids = plant_repo::list_image_ids(&self.db, id).await?;
        let issues = plant_repo::list_issues(&self.db, id).await?;
        Ok(Some(PlantDetail {
            row,
            image_ids,
            issues,
        }))
    }

    async fn list_plants(&self) -> anyhow::Result<Vec<PlantSummaryRow>> {
        plant_repo::list_summaries(&self.db).await
    }

    async fn list_plants_by_group(&self, group_id: &str) -> anyhow::Result<Vec<PlantSummaryRow>> {
        plant_repo::list_summaries_by_group(&self.db, group_id).await
    }

    async fn plant_exists(&self, id: &str) -> anyhow::Result<bool> {
        plant_repo::exists(&self.db, id).await
    }

    async fn count_plants_in_group(&self, group_id: &str) -> anyhow::Result<i64> {
        plant_repo::count_in_group(&self.db, group_id).await
    }

    async fn delete_plant(&self, id: &str) -> anyhow::Result<bool> {
        plant_repo::delete_by_id(&self.db, id).await
    }

    async fn delete_all_plants(&self) -> anyhow::Result<u64> {
        plant_repo::delete_all(&self.db).await
    }
}
