use tracing::{info, warn};

use super::{
    dto::{CreatePlantRequest, UpdatePlantRequest},
    repo_types::{NewIssue, NewPlant, PlantDetail, PlantRow, PlantSummaryRow},
};
use crate::{
    error::{AppError, AppResult, FieldError},
    state::AppState,
};

pub async fn list_plants(st: &AppState) -> AppResult<Vec<PlantSummaryRow>> {
    Ok(st.store.list_plants().await?)
}

pub async fn list_plants_by_group(st: &AppState, group_id: &str) -> AppResult<Vec<PlantSummaryRow>> {
    if !st.store.group_exists(group_id).await? {
        return Err(AppError::NotFound(format!(
            "Plant group not found: {group_id}"
        )));
    }
    Ok(st.store.list_plants_by_group(group_id).await?)
}

pub async fn get_plant(st: &AppState, id: &str) -> AppResult<PlantDetail> {
    st.store
        .find_plant(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Plant not found: {id}")))
}

pub async fn create_plant(st: &AppState, req: CreatePlantRequest) -> AppResult<PlantDetail> {
    req.validate()?;

    if st.store.plant_exists(&req.id).await? {
        warn!(plant_id = %req.id, "plant already exists");
        return Err(AppError::Conflict(format!(
            "Plant with ID '{}' already exists",
            req.id
        )));
    }
    check_references(st, &req.plant).await?;

    let plant = build_plant(req.id, req.plant);
    st.store
        .insert_plant(&plant)
        .await
        .map_err(|e| AppError::from_insert(e, "Plant"))?;

    info!(
        plant_id = %plant.row.id,
        images = plant.image_ids.len(),
        issues = plant.issues.len(),
        "plant created"
    );
    get_plant(st, &plant.row.id).await
}

/// Scalars are overwritten; gallery and issues are replaced wholesale.
pub async fn update_plant(
    st: &AppState,
    id: &str,
    req: UpdatePlantRequest,
) -> AppResult<PlantDetail> {
    req.validate()?;

    if !st.store.plant_exists(id).await? {
        return Err(AppError::NotFound(format!("Plant not found: {id}")));
    }
    check_references(st, &req).await?;

    let plant = build_plant(id.to_string(), req);
    if !st.store.replace_plant(&plant).await? {
        return Err(AppError::NotFound(format!("Plant not found: {id}")));
    }

    info!(plant_id = %id, "plant updated");
    get_plant(st, id).await
}

pub async fn delete_plant(st: &AppState, id: &str) -> AppResult<()> {
    if !st.store.delete_plant(id).await? {
        return Err(AppError::NotFound(format!("Plant not found: {id}")));
    }
    info!(plant_id = %id, "plant deleted");
    Ok(())
}

/// Group, thumbnail, then every gallery image; all misses are reported together.
async fn check_references(st: &AppState, req: &UpdatePlantRequest) -> AppResult<()> {
    let mut missing = Vec::new();

    if !st.store.group_exists(&req.group_id).await? {
        missing.push(FieldError::new(
            "groupId",
            format!("Plant group not found: {}", req.group_id),
        ));
    }
    if !st.store.image_exists(&req.thumbnail_id).await? {
        missing.push(FieldError::new(
            "thumbnailId",
            format!("Thumbnail image not found: {}", req.thumbnail_id),
        ));
    }
    for (n, image_id) in req.image_ids.iter().enumerate() {
        if !st.store.image_exists(image_id).await? {
            missing.push(FieldError::new(
                format!("imageIds[{n}]"),
                format!("Image not found: {image_id}"),
            ));
        }
    }

    match missing.first() {
        None => Ok(()),
        Some(first) => {
            warn!(missing = missing.len(), "plant references unknown entities");
            Err(AppError::Validation {
                message: first.message.clone(),
                errors: missing,
            })
        }
    }
}

fn build_plant(id: String, req: UpdatePlantRequest) -> NewPlant {
    let issues = req
        .common_issues
        .into_iter()
        .map(|i| NewIssue {
            plant_id: id.clone(),
            issue: i.issue,
            solution: i.solution,
        })
        .collect();

    NewPlant {
        row: PlantRow {
            id,
            group_id: req.group_id,
            name: req.name,
            scientific_name: req.scientific_name,
            thumbnail_id: Some(req.thumbnail_id),
            description: req.description,
            size: req.size,
            toxicity: req.toxicity,
            benefits: req.benefits,
            care: req.care.unwrap_or_default().into(),
        },
        image_ids: req.image_ids,
        issues,
    }
}

#[cfg(test)]
mod plant_tests {
    use super::*;
    use crate::{
        groups::{dto::CreatePlantGroupRequest, services::create_group},
        images::services::{upload_image, UploadItem},
        plants::dto::{CareGuideDto, IssueDto},
    };
    use bytes::Bytes;

    struct Fixture {
        st: AppState,
        thumb: String,
        gallery: Vec<String>,
    }

    async fn fixture() -> Fixture {
        let st = AppState::fake();
        let mut ids = Vec::new();
        for n in 0..4 {
            let meta = upload_image(
                &st,
                UploadItem {
                    filename: format!("img-{n}.jpg"),
                    content_type: Some("image/jpeg".into()),
                    body: Bytes::from(vec![0xFF, 0xD8, n as u8]),
                },
            )
            .await
            .unwrap();
            ids.push(meta.id);
        }
        for g in ["succulents", "ferns"] {
            create_group(
                &st,
                CreatePlantGroupRequest {
                    id: g.into(),
                    name: g.into(),
                    image_id: None,
                },
            )
            .await
            .unwrap();
        }
        let thumb = ids.remove(0);
        Fixture {
            st,
            thumb,
            gallery: ids,
        }
    }

    fn body(f: &Fixture, group: &str, issues: usize) -> UpdatePlantRequest {
        UpdatePlantRequest {
            group_id: group.into(),
            name: "Aloe Vera".into(),
            scientific_name: "Aloe barbadensis miller".into(),
            thumbnail_id: f.thumb.clone(),
            image_ids: f.gallery.clone(),
            description: "A succulent plant species".into(),
            size: "12-24 inches".into(),
            toxicity: "Mildly toxic to pets".into(),
            benefits: vec!["a".into(), "b".into(), "c".into(), "d".into()],
            care: Some(CareGuideDto {
                watering: "Water deeply but infrequently".into(),
                light: "Bright, indirect sunlight".into(),
                temperature: "55-80°F".into(),
                humidity: "low to moderate".into(),
                soil: "Well-draining".into(),
                fertilizing: "sparingly".into(),
            }),
            common_issues: (0..issues)
                .map(|n| IssueDto {
                    issue: format!("issue {n}"),
                    solution: format!("solution {n}"),
                })
                .collect(),
        }
    }

    fn create(f: &Fixture, id: &str, group: &str) -> CreatePlantRequest {
        CreatePlantRequest {
            id: id.into(),
            plant: body(f, group, 3),
        }
    }

    #[tokio::test]
    async fn create_then_get_returns_input_fields() {
        let f = fixture().await;
        let created = create_plant(&f.st, create(&f, "aloe-vera", "succulents"))
            .await
            .unwrap();

        assert_eq!(created.row.name, "Aloe Vera");
        assert_eq!(created.row.thumbnail_id.as_deref(), Some(f.thumb.as_str()));
        assert_eq!(created.image_ids, f.gallery);
        assert_eq!(created.issues.len(), 3);
        assert!(created.issues.iter().all(|i| i.plant_id == "aloe-vera"));
        assert_eq!(created.row.care.temperature, "55-80°F");
        assert_eq!(get_plant(&f.st, "aloe-vera").await.unwrap(), created);
    }

    #[tokio::test]
    async fn gallery_order_follows_request() {
        let f = fixture().await;
        let mut req = create(&f, "jade", "succulents");
        req.plant.image_ids.reverse();
        let expected = req.plant.image_ids.clone();
        let created = create_plant(&f.st, req).await.unwrap();
        assert_eq!(created.image_ids, expected);
    }

    #[tokio::test]
    async fn duplicate_id_is_conflict_and_keeps_original() {
        let f = fixture().await;
        create_plant(&f.st, create(&f, "aloe-vera", "succulents"))
            .await
            .unwrap();
        let mut again = create(&f, "aloe-vera", "ferns");
        again.plant.name = "Other".into();
        let err = create_plant(&f.st, again).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
        assert_eq!(
            get_plant(&f.st, "aloe-vera").await.unwrap().row.name,
            "Aloe Vera"
        );
    }

    #[tokio::test]
    async fn unknown_references_are_validation_errors_and_write_nothing() {
        let f = fixture().await;

        let mut bad_group = create(&f, "p1", "nope");
        bad_group.plant.group_id = "nope".into();
        let mut bad_thumb = create(&f, "p2", "succulents");
        bad_thumb.plant.thumbnail_id = "ghost".into();
        let mut bad_gallery = create(&f, "p3", "succulents");
        bad_gallery.plant.image_ids.push("ghost".into());
        bad_gallery.plant.image_ids.remove(0);

        for req in [bad_group, bad_thumb, bad_gallery] {
            let id = req.id.clone();
            let err = create_plant(&f.st, req).await.unwrap_err();
            assert!(matches!(err, AppError::Validation { .. }), "{id}: {err:?}");
            assert!(matches!(
                get_plant(&f.st, &id).await.unwrap_err(),
                AppError::NotFound(_)
            ));
        }
        assert!(list_plants(&f.st).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn every_missing_gallery_image_is_reported() {
        let f = fixture().await;
        let mut req = create(&f, "p", "succulents");
        req.plant.image_ids = vec!["x".into(), f.gallery[0].clone(), "y".into()];
        match create_plant(&f.st, req).await.unwrap_err() {
            AppError::Validation { message, errors } => {
                assert_eq!(message, "Image not found: x");
                let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
                assert_eq!(fields, vec!["imageIds[0]", "imageIds[2]"]);
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[tokio::test]
    async fn update_replaces_gallery_and_issues() {
        let f = fixture().await;
        create_plant(&f.st, create(&f, "aloe-vera", "succulents"))
            .await
            .unwrap();

        let mut next = body(&f, "ferns", 2);
        next.name = "Aloe".into();
        next.image_ids = vec![f.gallery[2].clone()];
        let updated = update_plant(&f.st, "aloe-vera", next).await.unwrap();

        assert_eq!(updated.row.name, "Aloe");
        assert_eq!(updated.row.group_id, "ferns");
        assert_eq!(updated.image_ids, vec![f.gallery[2].clone()]);
        let texts: Vec<_> = updated.issues.iter().map(|i| i.issue.as_str()).collect();
        assert_eq!(texts, vec!["issue 0", "issue 1"]);
        assert!(list_plants_by_group(&f.st, "succulents")
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn update_unknown_plant_is_not_found() {
        let f = fixture().await;
        let err = update_plant(&f.st, "ghost", body(&f, "ferns", 2))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        assert!(list_plants(&f.st).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn update_with_bad_reference_keeps_previous_state() {
        let f = fixture().await;
        let before = create_plant(&f.st, create(&f, "aloe-vera", "succulents"))
            .await
            .unwrap();
        let mut next = body(&f, "succulents", 2);
        next.thumbnail_id = "ghost".into();
        let err = update_plant(&f.st, "aloe-vera", next).await.unwrap_err();
        assert!(matches!(err, AppError::Validation { .. }));
        assert_eq!(get_plant(&f.st, "aloe-vera").await.unwrap(), before);
    }

    #[tokio::test]
    async fn delete_removes_plant_from_group_listing() {
        let f = fixture().await;
        create_plant(&f.st, create(&f, "aloe-vera", "succulents"))
            .await
            .unwrap();
        create_plant(&f.st, create(&f, "jade", "succulents"))
            .await
            .unwrap();

        delete_plant(&f.st, "aloe-vera").await.unwrap();
        let ids: Vec<_> = list_plants_by_group(&f.st, "succulents")
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(ids, vec!["jade".to_string()]);
        assert!(matches!(
            delete_plant(&f.st, "aloe-vera").await.unwrap_err(),
            AppError::NotFound(_)
        ));
    }

    #[tokio::test]
    async fn list_by_group_distinguishes_unknown_and_empty() {
        let f = fixture().await;
        assert!(matches!(
            list_plants_by_group(&f.st, "cacti").await.unwrap_err(),
            AppError::NotFound(_)
        ));
        assert!(list_plants_by_group(&f.st, "ferns").await.unwrap().is_empty());
    }
}
