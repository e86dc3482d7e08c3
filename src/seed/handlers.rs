use axum::{extract::State, routing::post, Json, Router};
use tracing::instrument;

use super::{dto::MessageResponse, services};
use crate::{
    error::{AppError, AppResult},
    state::AppState,
};

pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/admin/seed", post(seed_database))
        .route("/admin/reset", post(reset_database))
}

#[instrument(skip(state))]
pub async fn seed_database(State(state): State<AppState>) -> AppResult<Json<MessageResponse>> {
    services::seed_database(&state)
        .await
        .map_err(|e| with_prefix(e, "Failed to seed database"))?;
    Ok(Json(MessageResponse::new("Database seeded successfully")))
}

#[instrument(skip(state))]
pub async fn reset_database(State(state): State<AppState>) -> AppResult<Json<MessageResponse>> {
    services::reset_database(&state)
        .await
        .map_err(|e| with_prefix(e, "Failed to reset database"))?;
    Ok(Json(MessageResponse::new(
        "Database reset and seeded successfully",
    )))
}

fn with_prefix(err: AppError, prefix: &str) -> AppError {
    match err {
        AppError::Io(msg) => AppError::Io(format!("{prefix}: {msg}")),
        other => other,
    }
}

#[cfg(test)]
mod handler_tests {
    use super::*;
    use axum::http::StatusCode;

    #[tokio::test]
    async fn seed_then_reset_answer_messages() {
        let state = AppState::fake();
        let Json(seeded) = seed_database(State(state.clone())).await.unwrap();
        assert_eq!(seeded.message, "Database seeded successfully");

        let Json(reset) = reset_database(State(state)).await.unwrap();
        assert_eq!(reset.message, "Database reset and seeded successfully");
    }

    #[tokio::test]
    async fn missing_fixture_is_500_with_prefixed_message() {
        let dir = tempfile::tempdir().unwrap();
        let state = AppState::fake_with_seed_dir(dir.path().to_path_buf());
        let err = seed_database(State(state)).await.unwrap_err();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(err.to_string().starts_with("Failed to seed database: "));
    }
}
