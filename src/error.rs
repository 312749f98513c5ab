use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::validation::ValidationError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Sensor limit of {limit} reached: {existing} stored, {requested} requested")]
    CapacityExceeded {
        existing: u64,
        requested: u64,
        limit: u64,
    },

    #[error("Consistency error: {0}")]
    Consistency(String),

    #[error("Avimex API error: {message}")]
    Upstream {
        status: Option<u16>,
        message: String,
    },

    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        Self::BadRequest(format!("Invalid id: {}", rejection.body_text()))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = match &self {
            Self::Database(e) => {
                tracing::error!("Database error: {e:?}");
                json!({
                    "message": "Database error",
                    "error": e.to_string(),
                })
            }
            Self::Validation(e) => {
                let mut body = json!({
                    "message": e.to_string(),
                    "fields": e.field_names(),
                });
                if let Some(item) = e.item {
                    body["item"] = json!(item);
                }
                body
            }
            Self::BadRequest(msg)
            | Self::NotFound(msg)
            | Self::Consistency(msg) => json!({ "message": msg }),
            Self::CapacityExceeded { .. } => json!({ "message": self.to_string() }),
            Self::Upstream { message, .. } => {
                tracing::error!("Avimex API error: {message}");
                json!({
                    "message": "Avimex API error",
                    "error": message,
                })
            }
            Self::Config(e) => {
                tracing::error!("Config error: {e:?}");
                json!({
                    "message": "Configuration error",
                    "error": e.to_string(),
                })
            }
            Self::Internal(msg) => {
                tracing::error!("Internal error: {msg}");
                json!({
                    "message": "Internal server error",
                    "error": msg,
                })
            }
        };

        (self.status_code(), Json(body)).into_response()
    }
}

impl AppError {
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::BadRequest(_) | Self::CapacityExceeded { .. } => {
                StatusCode::BAD_REQUEST
            }
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Consistency(_) => StatusCode::CONFLICT,
            Self::Database(_) | Self::Upstream { .. } | Self::Config(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;
