use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::instrument;

use super::{
    dto::{CreatePlantRequest, PlantResponse, PlantSummaryResponse, UpdatePlantRequest},
    services,
};
use crate::{error::AppResult, extractors::ApiJson, state::AppState};

pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/plants/:id", get(get_plant))
        .route("/plant-groups/:id/plants", get(list_plants_by_group))
}

pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/admin/plants", get(list_plants).post(create_plant))
        .route(
            "/admin/plants/:id",
            get(get_plant).put(update_plant).delete(delete_plant),
        )
}

#[instrument(skip(state))]
pub async fn list_plants(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<PlantSummaryResponse>>> {
    let plants = services::list_plants(&state).await?;
    Ok(Json(plants.into_iter().map(PlantSummaryResponse::from).collect()))
}

#[instrument(skip(state))]
pub async fn list_plants_by_group(
    State(state): State<AppState>,
    Path(group_id): Path<String>,
) -> AppResult<Json<Vec<PlantSummaryResponse>>> {
    let plants = services::list_plants_by_group(&state, &group_id).await?;
    Ok(Json(plants.into_iter().map(PlantSummaryResponse::from).collect()))
}

#[instrument(skip(state))]
pub async fn get_plant(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<PlantResponse>> {
    let plant = services::get_plant(&state, &id).await?;
    Ok(Json(plant.into()))
}

#[instrument(skip(state, req))]
pub async fn create_plant(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<CreatePlantRequest>,
) -> AppResult<(StatusCode, Json<PlantResponse>)> {
    let plant = services::create_plant(&state, req).await?;
    Ok((StatusCode::CREATED, Json(plant.into())))
}

#[instrument(skip(state, req))]
pub async fn update_plant(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<UpdatePlantRequest>,
) -> AppResult<Json<PlantResponse>> {
    let plant = services::update_plant(&state, &id, req).await?;
    Ok(Json(plant.into()))
}

#[instrument(skip(state))]
pub async fn delete_plant(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    services::delete_plant(&state, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}
