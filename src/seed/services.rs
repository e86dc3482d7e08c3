use std::{
    collections::{BTreeSet, HashMap},
    io::ErrorKind,
    path::Path,
};

use time::OffsetDateTime;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use super::dto::{SeedData, SeedPlant, SeedPlantGroup};
use crate::{
    error::{AppError, AppResult},
    groups::repo_types::PlantGroup,
    images::{repo_types::Image, services::mime_from_filename},
    plants::repo_types::{NewIssue, NewPlant, PlantRow},
    state::AppState,
};

const DATA_FILE: &str = "plants-data.json";
const IMAGE_DIR: &str = "images";

/// Filename of a fixture image mapped to the id it was stored under.
type ImageIds = HashMap<String, String>;

/// Loads the fixture into the catalog: images, then groups, then plants.
///
/// Each stage is written as one batch and is visible before the next one
/// resolves filenames against it. A failure part-way leaves earlier stages
/// committed.
#[instrument(skip(st), fields(seed_dir = %st.config.seed_dir.display()))]
pub async fn seed_database(st: &AppState) -> AppResult<()> {
    let data = read_seed_data(&st.config.seed_dir).await?;

    let filenames = collect_filenames(&data);
    let image_ids = load_images(st, &st.config.seed_dir, &filenames).await?;
    info!(images = image_ids.len(), "seed images stored");

    let groups = create_groups(st, &data.plant_groups, &image_ids).await?;
    info!(groups, "seed plant groups stored");

    let plants = create_plants(st, data.plants, &image_ids).await?;
    info!(plants, "seed plants stored");

    Ok(())
}

/// Empties the catalog in dependency order and seeds it again.
#[instrument(skip(st))]
pub async fn reset_database(st: &AppState) -> AppResult<()> {
    let plants = st.store.delete_all_plants().await?;
    let groups = st.store.delete_all_groups().await?;
    let images = st.store.delete_all_images().await?;
    info!(plants, groups, images, "catalog cleared");

    seed_database(st).await
}

async fn read_seed_data(seed_dir: &Path) -> AppResult<SeedData> {
    let path = seed_dir.join(DATA_FILE);
    let raw = tokio::fs::read(&path).await.map_err(|e| match e.kind() {
        ErrorKind::NotFound => AppError::Io(format!("Seed data file not found: {}", path.display())),
        _ => AppError::Io(format!("Failed to read {}: {e}", path.display())),
    })?;
    serde_json::from_slice(&raw)
        .map_err(|e| AppError::Io(format!("Invalid seed data in {}: {e}", path.display())))
}

/// Every filename referenced by a group image, a thumbnail or a gallery entry.
pub(crate) fn collect_filenames(data: &SeedData) -> BTreeSet<String> {
    let groups = data
        .plant_groups
        .iter()
        .filter_map(|g| g.image_filename.clone());
    let plants = data.plants.iter().flat_map(|p| {
        p.thumbnail_filename
            .iter()
            .chain(p.image_filenames.iter())
            .cloned()
    });
    groups.chain(plants).collect()
}

async fn load_images(
    st: &AppState,
    seed_dir: &Path,
    filenames: &BTreeSet<String>,
) -> AppResult<ImageIds> {
    let dir = seed_dir.join(IMAGE_DIR);
    let mut images = Vec::with_capacity(filenames.len());

    for filename in filenames {
        let bytes = tokio::fs::read(dir.join(filename))
            .await
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => {
                    warn!(%filename, "seed image missing");
                    AppError::Io(format!("Image file not found: {filename}"))
                }
                _ => AppError::Io(format!("Failed to read image file {filename}: {e}")),
            })?;
        images.push(Image {
            id: Uuid::new_v4().to_string(),
            filename: filename.clone(),
            content_type: mime_from_filename(filename).to_string(),
            bytes,
            created_date: OffsetDateTime::now_utc(),
        });
    }

    st.store.insert_images(&images).await?;
    Ok(images
        .into_iter()
        .map(|img| (img.filename, img.id))
        .collect())
}

async fn create_groups(
    st: &AppState,
    descriptors: &[SeedPlantGroup],
    image_ids: &ImageIds,
) -> AppResult<usize> {
    let groups: Vec<PlantGroup> = descriptors
        .iter()
        .map(|g| PlantGroup {
            id: g.id.clone(),
            name: g.name.clone(),
            image_id: resolve(image_ids, g.image_filename.as_deref()),
        })
        .collect();

    st.store
        .insert_groups(&groups)
        .await
        .map_err(|e| AppError::from_insert(e, "Plant group"))?;
    Ok(groups.len())
}

async fn create_plants(
    st: &AppState,
    descriptors: Vec<SeedPlant>,
    image_ids: &ImageIds,
) -> AppResult<usize> {
    let plants: Vec<NewPlant> = descriptors
        .into_iter()
        .map(|p| build_plant(p, image_ids))
        .collect();

    st.store
        .insert_plants(&plants)
        .await
        .map_err(|e| AppError::from_insert(e, "Plant"))?;
    Ok(plants.len())
}

fn build_plant(p: SeedPlant, image_ids: &ImageIds) -> NewPlant {
    let thumbnail_id = resolve(image_ids, p.thumbnail_filename.as_deref());
    // unresolved gallery entries are dropped, not fatal
    let gallery = p
        .image_filenames
        .iter()
        .filter_map(|f| image_ids.get(f).cloned())
        .collect();
    let issues = p
        .common_issues
        .into_iter()
        .map(|i| NewIssue {
            plant_id: p.id.clone(),
            issue: i.issue,
            solution: i.solution,
        })
        .collect();

    NewPlant {
        row: PlantRow {
            id: p.id,
            group_id: p.group_id,
            name: p.name,
            scientific_name: p.scientific_name,
            thumbnail_id,
            description: p.description,
            size: p.size,
            toxicity: p.toxicity,
            benefits: p.benefits,
            care: p.care.into(),
        },
        image_ids: gallery,
        issues,
    }
}

fn resolve(image_ids: &ImageIds, filename: Option<&str>) -> Option<String> {
    filename.and_then(|f| image_ids.get(f).cloned())
}

#[cfg(test)]
mod seed_tests {
    use super::*;
    use crate::{
        groups::services::list_groups,
        images::services::{get_image, list_images},
        plants::services::{get_plant, list_plants, list_plants_by_group},
    };
    use serde_json::json;

    fn write_fixture(dir: &Path, data: serde_json::Value, images: &[&str]) {
        std::fs::write(dir.join(DATA_FILE), data.to_string()).unwrap();
        std::fs::create_dir_all(dir.join(IMAGE_DIR)).unwrap();
        for name in images {
            std::fs::write(dir.join(IMAGE_DIR).join(name), b"\xFF\xD8\xFF\xD9").unwrap();
        }
    }

    fn tiny_plant(id: &str, thumb: &str, gallery: &[&str]) -> serde_json::Value {
        json!({
            "id": id,
            "groupId": "g",
            "name": id,
            "scientificName": "Testus",
            "thumbnailFilename": thumb,
            "imageFilenames": gallery,
            "description": "d",
            "size": "s",
            "toxicity": "t",
            "benefits": ["a", "b", "c", "d"],
            "care": {
                "watering": "w", "light": "l", "temperature": "t",
                "humidity": "h", "soil": "s", "fertilizing": "f"
            },
            "commonIssues": [
                {"issue": "i1", "solution": "s1"},
                {"issue": "i2", "solution": "s2"}
            ]
        })
    }

    #[tokio::test]
    async fn bundled_fixture_populates_catalog() {
        let st = AppState::fake();
        seed_database(&st).await.unwrap();

        let groups = list_groups(&st).await.unwrap();
        assert_eq!(groups.len(), 6);
        assert!(groups.iter().all(|g| g.image_id.is_some()));

        let plants = list_plants_by_group(&st, "succulents").await.unwrap();
        let mut ids: Vec<_> = plants.iter().map(|p| p.id.as_str()).collect();
        ids.sort_unstable();
        assert_eq!(ids, vec!["aloe-vera", "echeveria", "jade-plant", "snake-plant"]);

        let images = list_images(&st).await.unwrap();
        assert!(images.len() >= 13);
        assert!(images.iter().all(|i| i.content_type == "image/jpeg"));
    }

    #[tokio::test]
    async fn aloe_vera_references_resolve_to_stored_images() {
        let st = AppState::fake();
        seed_database(&st).await.unwrap();

        let aloe = get_plant(&st, "aloe-vera").await.unwrap();
        assert_eq!(aloe.row.name, "Aloe Vera");
        assert_eq!(aloe.row.scientific_name, "Aloe barbadensis miller");
        assert_eq!(aloe.issues.len(), 4);
        assert_eq!(aloe.image_ids.len(), 3);
        assert_eq!(aloe.row.benefits.len(), 5);
        assert!(aloe.row.care.watering.contains("Water deeply but infrequently"));
        assert!(aloe.issues.iter().all(|i| i.plant_id == "aloe-vera"));

        let thumb = get_image(&st, aloe.row.thumbnail_id.as_deref().unwrap())
            .await
            .unwrap();
        assert_eq!(thumb.filename, "aloe-vera-thumb.jpg");
        let first = get_image(&st, &aloe.image_ids[0]).await.unwrap();
        assert_eq!(first.filename, "aloe-detail-1.jpg");
    }

    #[tokio::test]
    async fn shared_filename_is_stored_once() {
        let dir = tempfile::tempdir().unwrap();
        write_fixture(
            dir.path(),
            json!({
                "plantGroups": [{"id": "g", "name": "G", "imageFilename": "shared.jpg"}],
                "plants": [tiny_plant("p", "shared.jpg", &["shared.jpg", "other.png"])]
            }),
            &["shared.jpg", "other.png"],
        );
        let st = AppState::fake_with_seed_dir(dir.path().to_path_buf());
        seed_database(&st).await.unwrap();

        let images = list_images(&st).await.unwrap();
        assert_eq!(images.len(), 2);
        let p = get_plant(&st, "p").await.unwrap();
        assert_eq!(p.row.thumbnail_id, Some(p.image_ids[0].clone()));
        let png = get_image(&st, &p.image_ids[1]).await.unwrap();
        assert_eq!(png.content_type, "image/png");
    }

    #[tokio::test]
    async fn missing_asset_is_io_error_and_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        write_fixture(
            dir.path(),
            json!({
                "plantGroups": [{"id": "g", "name": "G", "imageFilename": "present.jpg"}],
                "plants": [tiny_plant("p", "absent.jpg", &["present.jpg"])]
            }),
            &["present.jpg"],
        );
        let st = AppState::fake_with_seed_dir(dir.path().to_path_buf());

        match seed_database(&st).await.unwrap_err() {
            AppError::Io(msg) => assert_eq!(msg, "Image file not found: absent.jpg"),
            other => panic!("unexpected: {other:?}"),
        }
        assert!(list_images(&st).await.unwrap().is_empty());
        assert!(list_groups(&st).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn missing_fixture_document_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let st = AppState::fake_with_seed_dir(dir.path().to_path_buf());
        assert!(matches!(
            seed_database(&st).await.unwrap_err(),
            AppError::Io(_)
        ));
    }

    #[tokio::test]
    async fn seeding_twice_conflicts_on_group_id() {
        let st = AppState::fake();
        seed_database(&st).await.unwrap();
        let first_run = list_images(&st).await.unwrap().len();

        let err = seed_database(&st).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
        // images carry no natural key and are stored again
        assert_eq!(list_images(&st).await.unwrap().len(), first_run * 2);
        assert_eq!(list_groups(&st).await.unwrap().len(), 6);
    }

    #[tokio::test]
    async fn reset_restores_counts_with_fresh_image_ids() {
        let st = AppState::fake();
        seed_database(&st).await.unwrap();
        let before = get_plant(&st, "aloe-vera").await.unwrap();
        let images_before = list_images(&st).await.unwrap().len();

        reset_database(&st).await.unwrap();

        assert_eq!(list_groups(&st).await.unwrap().len(), 6);
        assert_eq!(list_plants(&st).await.unwrap().len(), 4);
        assert_eq!(list_images(&st).await.unwrap().len(), images_before);
        let after = get_plant(&st, "aloe-vera").await.unwrap();
        assert_eq!(after.issues.len(), before.issues.len());
        assert_ne!(after.row.thumbnail_id, before.row.thumbnail_id);
    }

    #[test]
    fn collect_filenames_deduplicates_and_skips_absent() {
        let data: SeedData = serde_json::from_value(json!({
            "plantGroups": [
                {"id": "a", "name": "A", "imageFilename": "x.jpg"},
                {"id": "b", "name": "B"}
            ],
            "plants": [tiny_plant("p", "x.jpg", &["y.jpg", "x.jpg"])]
        }))
        .unwrap();
        let names: Vec<_> = collect_filenames(&data).into_iter().collect();
        assert_eq!(names, vec!["x.jpg".to_string(), "y.jpg".to_string()]);
    }

    #[test]
    fn unresolved_gallery_entries_are_skipped() {
        let p: SeedPlant = serde_json::from_value(tiny_plant("p", "t.jpg", &["a.jpg", "gone.jpg"]))
            .unwrap();
        let ids: ImageIds = [("a.jpg".into(), "id-a".into()), ("t.jpg".into(), "id-t".into())]
            .into_iter()
            .collect();
        let plant = build_plant(p, &ids);
        assert_eq!(plant.image_ids, vec!["id-a".to_string()]);
        assert_eq!(plant.row.thumbnail_id.as_deref(), Some("id-t"));
        assert!(plant.issues.iter().all(|i| i.plant_id == "p"));
    }
}
