use axum::{
    extract::{multipart::MultipartRejection, DefaultBodyLimit, Multipart, Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{delete, get},
    Json, Router,
};
use tracing::instrument;

use super::{
    dto::{ImageResponse, UploadImageResponse},
    services::{self, UploadItem},
};
use crate::{
    error::{AppError, AppResult},
    state::AppState,
};

pub fn read_routes() -> Router<AppState> {
    Router::new().route("/images/:id", get(get_image))
}

pub fn admin_routes(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        .route("/admin/images", get(list_images).post(upload_image))
        .route("/admin/images/:id", delete(delete_image))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
}

/// Raw bytes served with the stored content type.
#[instrument(skip(state))]
pub async fn get_image(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Response> {
    let image = services::get_image(&state, &id).await?;
    Ok(([(header::CONTENT_TYPE, image.content_type)], image.bytes).into_response())
}

#[instrument(skip(state))]
pub async fn list_images(State(state): State<AppState>) -> AppResult<Json<Vec<ImageResponse>>> {
    let images = services::list_images(&state).await?;
    Ok(Json(images.into_iter().map(ImageResponse::from).collect()))
}

/// POST /admin/images (multipart, field `file`)
#[instrument(skip(state, mp))]
pub async fn upload_image(
    State(state): State<AppState>,
    mp: Result<Multipart, MultipartRejection>,
) -> AppResult<(StatusCode, Json<UploadImageResponse>)> {
    let mut mp = mp.map_err(|e| AppError::validation(e.body_text()))?;

    let mut upload = None;
    while let Some(field) = mp
        .next_field()
        .await
        .map_err(|e| AppError::validation(e.body_text()))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let filename = field.file_name().unwrap_or("unnamed").to_string();
        let content_type = field.content_type().map(str::to_string);
        let body = field
            .bytes()
            .await
            .map_err(|e| AppError::validation(e.body_text()))?;
        upload = Some(UploadItem {
            filename,
            content_type,
            body,
        });
        break;
    }
    let item = upload.ok_or_else(|| AppError::validation("Required part 'file' is missing"))?;

    let meta = services::upload_image(&state, item).await?;
    Ok((
        StatusCode::CREATED,
        Json(UploadImageResponse { image_id: meta.id }),
    ))
}

#[instrument(skip(state))]
pub async fn delete_image(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    services::delete_image(&state, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}
