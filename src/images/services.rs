use bytes::Bytes;
use time::OffsetDateTime;
use tracing::{info, warn};
use uuid::Uuid;

use super::repo_types::{Image, ImageMeta};
use crate::{
    error::{AppError, AppResult},
    state::AppState,
};

pub struct UploadItem {
    pub filename: String,
    pub content_type: Option<String>,
    pub body: Bytes,
}

pub async fn upload_image(st: &AppState, item: UploadItem) -> AppResult<ImageMeta> {
    if item.body.is_empty() {
        warn!(filename = %item.filename, "rejected empty upload");
        return Err(AppError::validation("Image file cannot be empty"));
    }
    let content_type = match item.content_type {
        Some(ct) if ct.starts_with("image/") => ct,
        other => {
            warn!(filename = %item.filename, content_type = ?other, "rejected non-image upload");
            return Err(AppError::validation(
                "File must be an image (content type: image/*)",
            ));
        }
    };

    let image = Image {
        id: Uuid::new_v4().to_string(),
        filename: item.filename,
        content_type,
        bytes: item.body.to_vec(),
        created_date: OffsetDateTime::now_utc(),
    };
    st.store.insert_image(&image).await?;

    info!(image_id = %image.id, filename = %image.filename, size = image.bytes.len(), "image uploaded");
    Ok(ImageMeta::from(&image))
}

pub async fn get_image(st: &AppState, id: &str) -> AppResult<Image> {
    st.store
        .find_image(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Image not found with id: {id}")))
}

pub async fn list_images(st: &AppState) -> AppResult<Vec<ImageMeta>> {
    Ok(st.store.list_images().await?)
}

/// Groups or plants still pointing at the image keep their dangling id.
pub async fn delete_image(st: &AppState, id: &str) -> AppResult<()> {
    if !st.store.delete_image(id).await? {
        return Err(AppError::NotFound(format!("Image not found with id: {id}")));
    }
    info!(image_id = %id, "image deleted");
    Ok(())
}

pub(crate) fn mime_from_filename(filename: &str) -> &'static str {
    let ext = filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        _ => "application/octet-stream",
    }
}
