use std::collections::{BTreeMap, HashMap, HashSet};

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{CatalogStore, DuplicateKey};
use crate::{
    groups::repo_types::PlantGroup,
    images::repo_types::{Image, ImageMeta},
    plants::repo_types::{Issue, NewIssue, NewPlant, PlantDetail, PlantRow, PlantSummaryRow},
};

#[derive(Default)]
struct Tables {
    images: BTreeMap<String, Image>,
    groups: BTreeMap<String, PlantGroup>,
    plants: BTreeMap<String, PlantRow>,
    galleries: HashMap<String, Vec<String>>,
    issues: BTreeMap<i64, Issue>,
    last_issue_id: i64,
}

impl Tables {
    fn push_issues(&mut self, issues: &[NewIssue]) {
        for i in issues {
            self.last_issue_id += 1;
            let id = self.last_issue_id;
            self.issues.insert(
                id,
                Issue {
                    id,
                    plant_id: i.plant_id.clone(),
                    issue: i.issue.clone(),
                    solution: i.solution.clone(),
                },
            );
        }
    }

    fn drop_plant_children(&mut self, plant_id: &str) {
        self.galleries.remove(plant_id);
        self.issues.retain(|_, i| i.plant_id != plant_id);
    }

    fn group_in_use(&self, group_id: &str) -> bool {
        self.plants.values().any(|p| p.group_id == group_id)
    }
}

/// In-process catalog with the same referential rules as the Postgres schema:
/// plants need an existing group, image references are never checked, and a
/// plant takes its gallery rows and issues with it when deleted.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn check_new_keys<'a>(
    existing: impl Fn(&str) -> bool,
    keys: impl Iterator<Item = &'a str>,
) -> anyhow::Result<()> {
    let mut seen = HashSet::new();
    for key in keys {
        if existing(key) || !seen.insert(key) {
            return Err(DuplicateKey(key.to_string()).into());
        }
    }
    Ok(())
}

#[async_trait]
impl CatalogStore for MemoryStore {
    async fn insert_images(&self, images: &[Image]) -> anyhow::Result<()> {
        let mut t = self.tables.write().await;
        check_new_keys(|k| t.images.contains_key(k), images.iter().map(|i| i.id.as_str()))?;
        for image in images {
            t.images.insert(image.id.clone(), image.clone());
        }
        Ok(())
    }

    async fn find_image(&self, id: &str) -> anyhow::Result<Option<Image>> {
        Ok(self.tables.read().await.images.get(id).cloned())
    }

    async fn list_images(&self) -> anyhow::Result<Vec<ImageMeta>> {
        let t = self.tables.read().await;
        let mut out: Vec<ImageMeta> = t.images.values().map(ImageMeta::from).collect();
        out.sort_by(|a, b| (a.created_date, &a.id).cmp(&(b.created_date, &b.id)));
        Ok(out)
    }

    async fn image_exists(&self, id: &str) -> anyhow::Result<bool> {
        Ok(self.tables.read().await.images.contains_key(id))
    }

    async fn delete_image(&self, id: &str) -> anyhow::Result<bool> {
        Ok(self.tables.write().await.images.remove(id).is_some())
    }

    async fn delete_all_images(&self) -> anyhow::Result<u64> {
        let mut t = self.tables.write().await;
        let n = t.images.len() as u64;
        t.images.clear();
        Ok(n)
    }

    async fn insert_groups(&self, groups: &[PlantGroup]) -> anyhow::Result<()> {
        let mut t = self.tables.write().await;
        check_new_keys(|k| t.groups.contains_key(k), groups.iter().map(|g| g.id.as_str()))?;
        for group in groups {
            t.groups.insert(group.id.clone(), group.clone());
        }
        Ok(())
    }

    async fn find_group(&self, id: &str) -> anyhow::Result<Option<PlantGroup>> {
        Ok(self.tables.read().await.groups.get(id).cloned())
    }

    async fn list_groups(&self) -> anyhow::Result<Vec<PlantGroup>> {
        Ok(self.tables.read().await.groups.values().cloned().collect())
    }

    async fn group_exists(&self, id: &str) -> anyhow::Result<bool> {
        Ok(self.tables.read().await.groups.contains_key(id))
    }

    async fn update_group(&self, group: &PlantGroup) -> anyhow::Result<bool> {
        let mut t = self.tables.write().await;
        match t.groups.get_mut(&group.id) {
            Some(existing) => {
                *existing = group.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_group(&self, id: &str) -> anyhow::Result<bool> {
        let mut t = self.tables.write().await;
        if t.group_in_use(id) {
            anyhow::bail!("plant group '{id}' is still referenced by plants");
        }
        Ok(t.groups.remove(id).is_some())
    }

    async fn delete_all_groups(&self) -> anyhow::Result<u64> {
        let mut t = self.tables.write().await;
        if !t.plants.is_empty() {
            anyhow::bail!("plant groups are still referenced by plants");
        }
        let n = t.groups.len() as u64;
        t.groups.clear();
        Ok(n)
    }

    async fn insert_plants(&self, plants: &[NewPlant]) -> anyhow::Result<()> {
        let mut t = self.tables.write().await;
        check_new_keys(
            |k| t.plants.contains_key(k),
            plants.iter().map(|p| p.row.id.as_str()),
        )?;
        if let Some(p) = plants.iter().find(|p| !t.groups.contains_key(&p.row.group_id)) {
            anyhow::bail!(
                "plant '{}' references unknown plant group '{}'",
                p.row.id,
                p.row.group_id
            );
        }
        for plant in plants {
            t.plants.insert(plant.row.id.clone(), plant.row.clone());
            t.galleries
                .insert(plant.row.id.clone(), plant.image_ids.clone());
            t.push_issues(&plant.issues);
        }
        Ok(())
    }

    async fn replace_plant(&self, plant: &NewPlant) -> anyhow::Result<bool> {
        let mut t = self.tables.write().await;
        if !t.plants.contains_key(&plant.row.id) {
            return Ok(false);
        }
        if !t.groups.contains_key(&plant.row.group_id) {
            anyhow::bail!(
                "plant '{}' references unknown plant group '{}'",
                plant.row.id,
                plant.row.group_id
            );
        }
        let id = plant.row.id.clone();
        t.drop_plant_children(&id);
        t.plants.insert(id.clone(), plant.row.clone());
        t.galleries.insert(id, plant.image_ids.clone());
        t.push_issues(&plant.issues);
        Ok(true)
    }

    async fn find_plant(&self, id: &str) -> anyhow::Result<Option<PlantDetail>> {
        let t = self.tables.read().await;
        let Some(row) = t.plants.get(id) else {
            return Ok(None);
        };
        Ok(Some(PlantDetail {
            row: row.clone(),
            image_ids: t.galleries.get(id).cloned().unwrap_or_default(),
            issues: t
                .issues
                .values()
                .filter(|i| i.plant_id == id)
                .cloned()
                .collect(),
        }))
    }

    async fn list_plants(&self) -> anyhow::Result<Vec<PlantSummaryRow>> {
        let t = self.tables.read().await;
        Ok(t.plants.values().map(PlantSummaryRow::from).collect())
    }

    async fn list_plants_by_group(&self, group_id: &str) -> anyhow::Result<Vec<PlantSummaryRow>> {
        let t = self.tables.read().await;
        Ok(t.plants
            .values()
            .filter(|p| p.group_id == group_id)
            .map(PlantSummaryRow::from)
            .collect())
    }

    async fn plant_exists(&self, id: &str) -> anyhow::Result<bool> {
        Ok(self.tables.read().await.plants.contains_key(id))
    }

    async fn count_plants_in_group(&self, group_id: &str) -> anyhow::Result<i64> {
        let t = self.tables.read().await;
        Ok(t.plants.values().filter(|p| p.group_id == group_id).count() as i64)
    }

    async fn delete_plant(&self, id: &str) -> anyhow::Result<bool> {
        let mut t = self.tables.write().await;
        if t.plants.remove(id).is_none() {
            return Ok(false);
        }
        t.drop_plant_children(id);
        Ok(true)
    }

    async fn delete_all_plants(&self) -> anyhow::Result<u64> {
        let mut t = self.tables.write().await;
        let n = t.plants.len() as u64;
        t.plants.clear();
        t.galleries.clear();
        t.issues.clear();
        Ok(n)
    }
}

#[cfg(test)]
mod memory_tests {
    use super::*;
    use crate::plants::repo_types::CareGuide;
    use time::OffsetDateTime;

    fn image(id: &str) -> Image {
        Image {
            id: id.into(),
            filename: format!("{id}.jpg"),
            content_type: "image/jpeg".into(),
            bytes: vec![1, 2, 3],
            created_date: OffsetDateTime::now_utc(),
        }
    }

    fn group(id: &str) -> PlantGroup {
        PlantGroup {
            id: id.into(),
            name: id.to_uppercase(),
            image_id: None,
        }
    }

    fn plant(id: &str, group_id: &str, issues: usize) -> NewPlant {
        NewPlant {
            row: PlantRow {
                id: id.into(),
                group_id: group_id.into(),
                name: id.into(),
                scientific_name: "Testus plantus".into(),
                thumbnail_id: None,
                description: "d".into(),
                size: "s".into(),
                toxicity: "t".into(),
                benefits: vec!["b".into()],
                care: CareGuide {
                    watering: "w".into(),
                    light: "l".into(),
                    temperature: "t".into(),
                    humidity: "h".into(),
                    soil: "s".into(),
                    fertilizing: "f".into(),
                },
            },
            image_ids: vec!["img-2".into(), "img-1".into()],
            issues: (0..issues)
                .map(|n| NewIssue {
                    plant_id: id.into(),
                    issue: format!("issue {n}"),
                    solution: format!("fix {n}"),
                })
                .collect(),
        }
    }

    #[tokio::test]
    async fn duplicate_batch_inserts_nothing() {
        let store = MemoryStore::new();
        store.insert_image(&image("a")).await.unwrap();
        let err = store
            .insert_images(&[image("b"), image("a")])
            .await
            .unwrap_err();
        assert!(err.downcast_ref::<DuplicateKey>().is_some());
        assert!(!store.image_exists("b").await.unwrap());
    }

    #[tokio::test]
    async fn plant_requires_existing_group() {
        let store = MemoryStore::new();
        let err = store.insert_plant(&plant("fern", "nope", 2)).await;
        assert!(err.is_err());
        assert!(!store.plant_exists("fern").await.unwrap());
    }

    #[tokio::test]
    async fn gallery_order_and_issue_ids_are_kept() {
        let store = MemoryStore::new();
        store.insert_group(&group("g")).await.unwrap();
        store.insert_plant(&plant("p1", "g", 2)).await.unwrap();
        store.insert_plant(&plant("p2", "g", 3)).await.unwrap();

        let p2 = store.find_plant("p2").await.unwrap().unwrap();
        assert_eq!(p2.image_ids, vec!["img-2".to_string(), "img-1".to_string()]);
        let ids: Vec<i64> = p2.issues.iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![3, 4, 5]);
    }

    #[tokio::test]
    async fn replace_swaps_children_wholesale() {
        let store = MemoryStore::new();
        store.insert_group(&group("g")).await.unwrap();
        store.insert_plant(&plant("p", "g", 4)).await.unwrap();

        let mut next = plant("p", "g", 2);
        next.image_ids = vec!["only".into()];
        assert!(store.replace_plant(&next).await.unwrap());

        let p = store.find_plant("p").await.unwrap().unwrap();
        assert_eq!(p.issues.len(), 2);
        assert_eq!(p.image_ids, vec!["only".to_string()]);
    }

    #[tokio::test]
    async fn deleting_plant_drops_issues_but_not_images() {
        let store = MemoryStore::new();
        store.insert_image(&image("img-1")).await.unwrap();
        store.insert_group(&group("g")).await.unwrap();
        store.insert_plant(&plant("p", "g", 2)).await.unwrap();

        assert!(store.delete_plant("p").await.unwrap());
        assert!(store.find_plant("p").await.unwrap().is_none());
        assert!(store.image_exists("img-1").await.unwrap());
        assert_eq!(store.tables.read().await.issues.len(), 0);
    }

    #[tokio::test]
    async fn group_with_plants_cannot_be_deleted() {
        let store = MemoryStore::new();
        store.insert_group(&group("g")).await.unwrap();
        store.insert_plant(&plant("p", "g", 2)).await.unwrap();
        assert!(store.delete_group("g").await.is_err());
        assert!(store.delete_all_groups().await.is_err());
        store.delete_all_plants().await.unwrap();
        assert_eq!(store.delete_all_groups().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn image_delete_leaves_references_dangling() {
        let store = MemoryStore::new();
        store.insert_image(&image("img")).await.unwrap();
        let mut g = group("g");
        g.image_id = Some("img".into());
        store.insert_group(&g).await.unwrap();

        assert!(store.delete_image("img").await.unwrap());
        let g = store.find_group("g").await.unwrap().unwrap();
        assert_eq!(g.image_id.as_deref(), Some("img"));
    }
}
