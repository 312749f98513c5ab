use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use sea_orm::{ActiveModelTrait, DbErr, EntityTrait, QueryOrder, Set};

use crate::common::AppState;
use crate::entity::procesos;
use crate::error::{AppError, AppResult};
use crate::routes::extract::{ApiJson, ApiPath};
use crate::services::{cascade, lookup};

use super::types::{ProcessDeletedResponse, ProcessPayload, ProcessResponse};

/// List all processes
#[utoipa::path(
    get,
    path = "/processes",
    responses(
        (status = 200, description = "Processes retrieved successfully", body = Vec<ProcessResponse>),
        (status = 204, description = "No processes stored"),
    ),
    tag = "processes"
)]
pub async fn list_processes(State(state): State<AppState>) -> AppResult<Response> {
    let processes = procesos::Entity::find()
        .order_by_asc(procesos::Column::Id)
        .all(&state.db)
        .await?;

    if processes.is_empty() {
        return Ok(StatusCode::NO_CONTENT.into_response());
    }

    let response: Vec<ProcessResponse> = processes.into_iter().map(Into::into).collect();
    Ok(Json(response).into_response())
}

/// Get the single active process
#[utoipa::path(
    get,
    path = "/process",
    responses(
        (status = 200, description = "Process retrieved successfully", body = ProcessResponse),
        (status = 204, description = "No process stored"),
        (status = 409, description = "More than one process stored"),
    ),
    tag = "processes"
)]
pub async fn get_current_process(State(state): State<AppState>) -> AppResult<Response> {
    match lookup::current_process(&state.db).await? {
        Some(process) => Ok(Json(ProcessResponse::from(process)).into_response()),
        None => Ok(StatusCode::NO_CONTENT.into_response()),
    }
}

/// Get a process by ID
#[utoipa::path(
    get,
    path = "/processes/{id}",
    params(("id" = i32, Path, description = "Process ID")),
    responses(
        (status = 200, description = "Process retrieved successfully", body = ProcessResponse),
        (status = 404, description = "Process not found"),
    ),
    tag = "processes"
)]
pub async fn get_process(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> AppResult<Json<ProcessResponse>> {
    let process = lookup::find_process(&state.db, id).await?;
    Ok(Json(process.into()))
}

/// Create a process
#[utoipa::path(
    post,
    path = "/processes",
    request_body = ProcessPayload,
    responses(
        (status = 201, description = "Process created", body = ProcessResponse),
        (status = 400, description = "Missing fields"),
    ),
    tag = "processes"
)]
pub async fn create_process(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<ProcessPayload>,
) -> AppResult<(StatusCode, Json<ProcessResponse>)> {
    let model = payload.into_active_model()?;
    let process = model.insert(&state.db).await?;

    tracing::info!(id = process.id, nombre = %process.nombre, "Process created");

    Ok((StatusCode::CREATED, Json(process.into())))
}

/// Replace a process
#[utoipa::path(
    put,
    path = "/processes/{id}",
    params(("id" = i32, Path, description = "Process ID")),
    request_body = ProcessPayload,
    responses(
        (status = 200, description = "Process updated", body = ProcessResponse),
        (status = 400, description = "Missing fields"),
        (status = 404, description = "Process not found"),
    ),
    tag = "processes"
)]
pub async fn update_process(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
    ApiJson(payload): ApiJson<ProcessPayload>,
) -> AppResult<Json<ProcessResponse>> {
    let mut model = payload.into_active_model()?;
    model.id = Set(id);

    let process = model.update(&state.db).await.map_err(|e| match e {
        DbErr::RecordNotUpdated => AppError::NotFound(format!("Process {id} not found")),
        other => other.into(),
    })?;

    tracing::info!(id, "Process updated");

    Ok(Json(process.into()))
}

/// Delete a process together with its subprocesses and sensors
#[utoipa::path(
    delete,
    path = "/processes/{id}",
    params(("id" = i32, Path, description = "Process ID")),
    responses(
        (status = 200, description = "Process and dependents deleted", body = ProcessDeletedResponse),
        (status = 404, description = "Process not found"),
    ),
    tag = "processes"
)]
pub async fn delete_process(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> AppResult<Json<ProcessDeletedResponse>> {
    let eliminados = cascade::delete_process(&state.db, id).await?;

    Ok(Json(ProcessDeletedResponse {
        message: "Process deleted with all its subprocesses and sensors".to_string(),
        eliminados,
    }))
}
