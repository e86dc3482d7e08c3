use tracing::{info, warn};

use super::{
    dto::{CreatePlantGroupRequest, UpdatePlantGroupRequest},
    repo_types::PlantGroup,
};
use crate::{
    error::{AppError, AppResult},
    state::AppState,
};

pub async fn list_groups(st: &AppState) -> AppResult<Vec<PlantGroup>> {
    Ok(st.store.list_groups().await?)
}

pub async fn get_group(st: &AppState, id: &str) -> AppResult<PlantGroup> {
    st.store
        .find_group(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Plant group not found with id: {id}")))
}

pub async fn create_group(st: &AppState, req: CreatePlantGroupRequest) -> AppResult<PlantGroup> {
    req.validate()?;

    if st.store.group_exists(&req.id).await? {
        warn!(group_id = %req.id, "plant group already exists");
        return Err(AppError::Conflict(format!(
            "Plant group with id '{}' already exists",
            req.id
        )));
    }
    let image_id = normalize_image_ref(req.image_id);
    ensure_image_exists(st, image_id.as_deref()).await?;

    let group = PlantGroup {
        id: req.id,
        name: req.name,
        image_id,
    };
    st.store
        .insert_group(&group)
        .await
        .map_err(|e| AppError::from_insert(e, "Plant group"))?;

    info!(group_id = %group.id, "plant group created");
    Ok(group)
}

pub async fn update_group(
    st: &AppState,
    id: &str,
    req: UpdatePlantGroupRequest,
) -> AppResult<PlantGroup> {
    req.validate()?;

    let mut group = get_group(st, id).await?;
    let image_id = normalize_image_ref(req.image_id);
    ensure_image_exists(st, image_id.as_deref()).await?;

    group.name = req.name;
    group.image_id = image_id;
    if !st.store.update_group(&group).await? {
        return Err(AppError::NotFound(format!(
            "Plant group not found with id: {id}"
        )));
    }

    info!(group_id = %group.id, "plant group updated");
    Ok(group)
}

pub async fn delete_group(st: &AppState, id: &str) -> AppResult<()> {
    if !st.store.group_exists(id).await? {
        return Err(AppError::NotFound(format!(
            "Plant group not found with id: {id}"
        )));
    }
    let plants = st.store.count_plants_in_group(id).await?;
    if plants > 0 {
        warn!(group_id = %id, plants, "plant group still has plants");
        return Err(AppError::Conflict(format!(
            "Plant group '{id}' still has {plants} plant(s)"
        )));
    }
    st.store.delete_group(id).await?;

    info!(group_id = %id, "plant group deleted");
    Ok(())
}

/// Blank ids count as "no image".
fn normalize_image_ref(image_id: Option<String>) -> Option<String> {
    image_id.filter(|id| !id.trim().is_empty())
}

async fn ensure_image_exists(st: &AppState, image_id: Option<&str>) -> AppResult<()> {
    let Some(id) = image_id else {
        return Ok(());
    };
    if !st.store.image_exists(id).await? {
        warn!(image_id = %id, "plant group references unknown image");
        return Err(AppError::NotFound(format!("Image not found with id: {id}")));
    }
    Ok(())
}
