use axum::{
    extract::Request,
    http::{StatusCode, Uri},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use time::OffsetDateTime;
use tracing::error;

use crate::store::DuplicateKey;

/// One rejected request field, reported under `validationErrors`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Bad input or a failed referential check at write time.
    #[error("{message}")]
    Validation {
        message: String,
        errors: Vec<FieldError>,
    },
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    /// Seed assets missing or unreadable.
    #[error("{0}")]
    Io(String),
    #[error("Unexpected error: {0:#}")]
    Unexpected(#[from] anyhow::Error),
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn validation(message: impl Into<String>) -> Self {
        AppError::Validation {
            message: message.into(),
            errors: Vec::new(),
        }
    }

    pub fn invalid_fields(errors: Vec<FieldError>) -> Self {
        AppError::Validation {
            message: "Validation failed".into(),
            errors,
        }
    }

    /// Classifies an insert failure: a taken primary key is a conflict.
    pub fn from_insert(e: anyhow::Error, entity: &str) -> Self {
        match e.downcast_ref::<DuplicateKey>() {
            Some(DuplicateKey(id)) => {
                AppError::Conflict(format!("{entity} with id '{id}' already exists"))
            }
            None => AppError::Unexpected(e),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Io(_) | AppError::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(e: std::io::Error) -> Self {
        AppError::Io(e.to_string())
    }
}

/// Body rendered for every 4xx/5xx answer.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
    pub status: u16,
    pub error: String,
    pub message: String,
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validation_errors: Option<Vec<FieldError>>,
}

impl ErrorBody {
    fn from_error(err: AppError) -> Self {
        let status = err.status();
        let message = err.to_string();
        let validation_errors = match err {
            AppError::Validation { errors, .. } if !errors.is_empty() => Some(errors),
            _ => None,
        };
        Self {
            timestamp: OffsetDateTime::now_utc(),
            status: status.as_u16(),
            error: status.canonical_reason().unwrap_or("Error").to_string(),
            message,
            path: String::new(),
            validation_errors,
        }
    }

    fn into_response_with(self, status: StatusCode) -> Response {
        let mut res = (status, Json(self.clone())).into_response();
        res.extensions_mut().insert(self);
        res
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self, "request failed");
        }
        ErrorBody::from_error(self).into_response_with(status)
    }
}

/// Stamps the request path into error bodies produced further down the stack.
pub async fn fill_error_path(req: Request, next: Next) -> Response {
    let path = req.uri().path().to_owned();
    let res = next.run(req).await;
    match res.extensions().get::<ErrorBody>() {
        Some(body) => {
            let mut body = body.clone();
            body.path = path;
            body.into_response_with(res.status())
        }
        None => res,
    }
}

pub async fn route_not_found(uri: Uri) -> AppError {
    AppError::NotFound(format!("No handler found for {}", uri.path()))
}
