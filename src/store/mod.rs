use async_trait::async_trait;

use crate::{
    groups::repo_types::PlantGroup,
    images::repo_types::{Image, ImageMeta},
    plants::repo_types::{NewPlant, PlantDetail, PlantSummaryRow},
};

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Raised by inserts when the primary key is already taken.
#[derive(Debug, thiserror::Error)]
#[error("duplicate key '{0}'")]
pub struct DuplicateKey(pub String);

/// Persistence behind the catalog services.
///
/// Batch inserts are all-or-nothing and durable once they return, so a caller
/// may read back what it just wrote before starting the next step.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    async fn insert_images(&self, images: &[Image]) -> anyhow::Result<()>;
    async fn find_image(&self, id: &str) -> anyhow::Result<Option<Image>>;
    async fn list_images(&self) -> anyhow::Result<Vec<ImageMeta>>;
    async fn image_exists(&self, id: &str) -> anyhow::Result<bool>;
    async fn delete_image(&self, id: &str) -> anyhow::Result<bool>;
    async fn delete_all_images(&self) -> anyhow::Result<u64>;

    async fn insert_groups(&self, groups: &[PlantGroup]) -> anyhow::Result<()>;
    async fn find_group(&self, id: &str) -> anyhow::Result<Option<PlantGroup>>;
    async fn list_groups(&self) -> anyhow::Result<Vec<PlantGroup>>;
    async fn group_exists(&self, id: &str) -> anyhow::Result<bool>;
    async fn update_group(&self, group: &PlantGroup) -> anyhow::Result<bool>;
    async fn delete_group(&self, id: &str) -> anyhow::Result<bool>;
    async fn delete_all_groups(&self) -> anyhow::Result<u64>;

    async fn insert_plants(&self, plants: &[NewPlant]) -> anyhow::Result<()>;
    async fn replace_plant(&self, plant: &NewPlant) -> anyhow::Result<bool>;
    async fn find_plant(&self, id: &str) -> anyhow::Result<Option<PlantDetail>>;
    async fn list_plants(&self) -> anyhow::Result<Vec<PlantSummaryRow>>;
    async fn list_plants_by_group(&self, group_id: &str) -> anyhow::Result<Vec<PlantSummaryRow>>;
    async fn plant_exists(&self, id: &str) -> anyhow::Result<bool>;
    async fn count_plants_in_group(&self, group_id: &str) -> anyhow::Result<i64>;
    async fn delete_plant(&self, id: &str) -> anyhow::Result<bool>;
    async fn delete_all_plants(&self) -> anyhow::Result<u64>;

    async fn insert_image(&self, image: &Image) -> anyhow::Result<()> {
        self.insert_images(std::slice::from_ref(image)).await
    }

    async fn insert_group(&self, group: &PlantGroup) -> anyhow::Result<()> {
        self.insert_groups(std::slice::from_ref(group)).await
    }

    async fn insert_plant(&self, plant: &NewPlant) -> anyhow::Result<()> {
        self.insert_plants(std::slice::from_ref(plant)).await
    }
}
