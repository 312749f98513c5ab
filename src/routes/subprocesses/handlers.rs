use axum::{extract::State, http::StatusCode, Json};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DbErr, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set,
    TransactionTrait,
};

use crate::common::AppState;
use crate::entity::subprocesos;
use crate::error::{AppError, AppResult};
use crate::routes::extract::{ApiJson, ApiPath};
use crate::routes::MessageResponse;
use crate::services::lookup;

use super::types::{SubprocessPayload, SubprocessResponse, DEFAULT_ESTATUS};

/// Create a subprocess under a process
#[utoipa::path(
    post,
    path = "/processes/{proceso_id}/subprocesses",
    params(("proceso_id" = i32, Path, description = "Parent process ID")),
    request_body = SubprocessPayload,
    responses(
        (status = 201, description = "Subprocess created", body = SubprocessResponse),
        (status = 400, description = "Missing or malformed fields"),
        (status = 404, description = "Process not found"),
    ),
    tag = "subprocesses"
)]
pub async fn create_subprocess(
    State(state): State<AppState>,
    ApiPath(proceso_id): ApiPath<i32>,
    ApiJson(payload): ApiJson<SubprocessPayload>,
) -> AppResult<(StatusCode, Json<SubprocessResponse>)> {
    let mut model = payload.into_active_model()?;

    let txn = state.db.begin().await?;
    lookup::find_process(&txn, proceso_id).await?;

    // Display sequence continues from the highest number in this process
    let last: Option<i32> = subprocesos::Entity::find()
        .select_only()
        .column_as(subprocesos::Column::IdSubproceso.max(), "last")
        .filter(subprocesos::Column::ProcesoId.eq(proceso_id))
        .into_tuple::<Option<i32>>()
        .one(&txn)
        .await?
        .flatten();

    model.proceso_id = Set(proceso_id);
    model.id_subproceso = Set(Some(last.unwrap_or(0) + 1));
    if model.estatus.is_not_set() {
        model.estatus = Set(DEFAULT_ESTATUS.to_string());
    }

    let subprocess = model.insert(&txn).await?;
    txn.commit().await?;

    tracing::info!(
        id = subprocess.id,
        proceso_id,
        id_subproceso = ?subprocess.id_subproceso,
        "Subprocess created"
    );

    Ok((StatusCode::CREATED, Json(subprocess.into())))
}

/// List the subprocesses of a process in creation order
#[utoipa::path(
    get,
    path = "/processes/{proceso_id}/subprocesses",
    params(("proceso_id" = i32, Path, description = "Parent process ID")),
    responses(
        (status = 200, description = "Subprocesses retrieved successfully", body = Vec<SubprocessResponse>),
        (status = 404, description = "Process not found"),
    ),
    tag = "subprocesses"
)]
pub async fn list_subprocesses(
    State(state): State<AppState>,
    ApiPath(proceso_id): ApiPath<i32>,
) -> AppResult<Json<Vec<SubprocessResponse>>> {
    lookup::find_process(&state.db, proceso_id).await?;

    let subprocesses = subprocesos::Entity::find()
        .filter(subprocesos::Column::ProcesoId.eq(proceso_id))
        .order_by_asc(subprocesos::Column::Id)
        .all(&state.db)
        .await?;

    Ok(Json(subprocesses.into_iter().map(Into::into).collect()))
}

/// Get a subprocess by ID
#[utoipa::path(
    get,
    path = "/subprocesses/{id}",
    params(("id" = i32, Path, description = "Subprocess ID")),
    responses(
        (status = 200, description = "Subprocess retrieved successfully", body = SubprocessResponse),
        (status = 404, description = "Subprocess not found"),
    ),
    tag = "subprocesses"
)]
pub async fn get_subprocess(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> AppResult<Json<SubprocessResponse>> {
    let subprocess = subprocesos::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Subprocess {id} not found")))?;

    Ok(Json(subprocess.into()))
}

/// Replace a subprocess. The parent process and display sequence are kept.
#[utoipa::path(
    put,
    path = "/subprocesses/{id}",
    params(("id" = i32, Path, description = "Subprocess ID")),
    request_body = SubprocessPayload,
    responses(
        (status = 200, description = "Subprocess updated", body = SubprocessResponse),
        (status = 400, description = "Missing or malformed fields"),
        (status = 404, description = "Subprocess not found"),
    ),
    tag = "subprocesses"
)]
pub async fn update_subprocess(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
    ApiJson(payload): ApiJson<SubprocessPayload>,
) -> AppResult<Json<SubprocessResponse>> {
    let mut model = payload.into_active_model()?;
    model.id = Set(id);

    let subprocess = model.update(&state.db).await.map_err(|e| match e {
        DbErr::RecordNotUpdated => AppError::NotFound(format!("Subprocess {id} not found")),
        other => other.into(),
    })?;

    tracing::info!(id, "Subprocess updated");

    Ok(Json(subprocess.into()))
}

/// Delete a subprocess
#[utoipa::path(
    delete,
    path = "/subprocesses/{id}",
    params(("id" = i32, Path, description = "Subprocess ID")),
    responses(
        (status = 200, description = "Subprocess deleted", body = MessageResponse),
        (status = 404, description = "Subprocess not found"),
    ),
    tag = "subprocesses"
)]
pub async fn delete_subprocess(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> AppResult<Json<MessageResponse>> {
    let result = subprocesos::Entity::delete_by_id(id).exec(&state.db).await?;

    if result.rows_affected == 0 {
        return Err(AppError::NotFound(format!("Subprocess {id} not found")));
    }

    Ok(Json(MessageResponse::new("Subprocess deleted")))
}
