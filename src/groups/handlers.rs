use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::instrument;

use super::{
    dto::{CreatePlantGroupRequest, PlantGroupResponse, UpdatePlantGroupRequest},
    services,
};
use crate::{error::AppResult, extractors::ApiJson, state::AppState};

pub fn read_routes() -> Router<AppState> {
    Router::new().route("/plant-groups", get(list_groups))
}

pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/admin/plant-groups", get(list_groups).post(create_group))
        .route(
            "/admin/plant-groups/:id",
            get(get_group).put(update_group).delete(delete_group),
        )
}

#[instrument(skip(state))]
pub async fn list_groups(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<PlantGroupResponse>>> {
    let groups = services::list_groups(&state).await?;
    Ok(Json(groups.into_iter().map(PlantGroupResponse::from).collect()))
}

#[instrument(skip(state))]
pub async fn get_group(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<PlantGroupResponse>> {
    let group = services::get_group(&state, &id).await?;
    Ok(Json(group.into()))
}

#[instrument(skip(state, req))]
pub async fn create_group(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<CreatePlantGroupRequest>,
) -> AppResult<(StatusCode, Json<PlantGroupResponse>)> {
    let group = services::create_group(&state, req).await?;
    Ok((StatusCode::CREATED, Json(group.into())))
}

#[instrument(skip(state, req))]
pub async fn update_group(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<UpdatePlantGroupRequest>,
) -> AppResult<Json<PlantGroupResponse>> {
    let group = services::update_group(&state, &id, req).await?;
    Ok(Json(group.into()))
}

#[instrument(skip(state))]
pub async fn delete_group(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    services::delete_group(&state, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod handler_tests {
    use super::*;

    #[tokio::test]
    async fn create_answers_201_and_camel_case_body() {
        let state = AppState::fake();
        let (status, Json(body)) = create_group(
            State(state.clone()),
            ApiJson(CreatePlantGroupRequest {
                id: "tropical".into(),
                name: "Tropical Plants".into(),
                image_id: None,
            }),
        )
        .await
        .unwrap();
        assert_eq!(status, StatusCode::CREATED);
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["id"], "tropical");
        assert!(json["imageId"].is_null());

        let Json(all) = list_groups(State(state)).await.unwrap();
        assert_eq!(all.len(), 1);
    }

    #[tokio::test]
    async fn delete_answers_204_then_404() {
        let state = AppState::fake();
        services::create_group(
            &state,
            CreatePlantGroupRequest {
                id: "herbs".into(),
                name: "Herbs".into(),
                image_id: None,
            },
        )
        .await
        .unwrap();

        let status = delete_group(State(state.clone()), Path("herbs".into()))
            .await
            .unwrap();
        assert_eq!(status, StatusCode::NO_CONTENT);
        let err = get_group(State(state), Path("herbs".into())).await.unwrap_err();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }
}
