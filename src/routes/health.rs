use axum::{extract::State, Json};
use sea_orm::{ConnectionTrait, Statement};
use serde::Serialize;
use utoipa::ToSchema;

use crate::common::AppState;
use crate::error::{AppError, AppResult};

#[derive(Debug, Serialize, ToSchema)]
pub struct PingResponse {
    pub message: String,
    pub resultado: i32,
}

/// Liveness check that also round-trips the database
#[utoipa::path(
    get,
    path = "/ping",
    responses(
        (status = 200, description = "Server and database are up", body = PingResponse),
        (status = 500, description = "Database unreachable"),
    ),
    tag = "health"
)]
pub async fn ping(State(state): State<AppState>) -> AppResult<Json<PingResponse>> {
    let backend = state.db.get_database_backend();
    let row = state
        .db
        .query_one(Statement::from_string(backend, "SELECT 1 + 1 AS result"))
        .await?
        .ok_or_else(|| AppError::Internal("Ping query returned no row".to_string()))?;

    let resultado: i32 = row.try_get("", "result")?;

    Ok(Json(PingResponse {
        message: "Pong! Server and database are up".to_string(),
        resultado,
    }))
}
