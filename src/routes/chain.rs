use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::avimex::ForwardReport;
use crate::chain;
use crate::common::AppState;
use crate::error::AppResult;
use crate::routes::extract::{ApiJson, ApiPath};
use crate::services::cascade::{self, DeletedRows};
use crate::validation::{input, EntityKind, FieldViolation, ValidationError};

#[derive(Debug, Deserialize, ToSchema)]
pub struct StatusPayload {
    #[serde(default, deserialize_with = "input::status")]
    #[schema(value_type = String, example = "1")]
    pub estatus: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StatusResponse {
    pub message: String,
    pub proceso_id: i32,
    pub cadena: String,
    pub envio: ForwardReport,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ChainResponse {
    pub cadena: String,
    pub envio: ForwardReport,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CleanDatabaseResponse {
    pub message: String,
    pub cadena: String,
    pub envio: ForwardReport,
    pub eliminados: DeletedRows,
}

/// Update a subprocess status and send the rebuilt chain to Avimex
///
/// The chain is returned even when forwarding fails; `envio` reports the outcome.
#[utoipa::path(
    put,
    path = "/estatus/{id}",
    params(("id" = i32, Path, description = "Subprocess ID")),
    request_body = StatusPayload,
    responses(
        (status = 200, description = "Status updated and chain rebuilt", body = StatusResponse),
        (status = 400, description = "Missing status"),
        (status = 404, description = "Subprocess not found"),
    ),
    tag = "chain"
)]
pub async fn update_status(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
    ApiJson(payload): ApiJson<StatusPayload>,
) -> AppResult<Json<StatusResponse>> {
    let estatus = payload.estatus.ok_or_else(|| ValidationError {
        violations: vec![FieldViolation::missing("estatus")],
        item: None,
    })?;
    if let Some(violation) = EntityKind::Subprocess.check_len("estatus", &estatus) {
        return Err(ValidationError {
            violations: vec![violation],
            item: None,
        }
        .into());
    }

    let update =
        cascade::update_subprocess_status(&state.db, &state.avimex_client, id, &estatus).await?;

    Ok(Json(StatusResponse {
        message: "Subprocess status updated".to_string(),
        proceso_id: update.proceso_id,
        cadena: update.chain.encode(),
        envio: update.envio,
    }))
}

/// Build the chain for every stored process and send it to Avimex
#[utoipa::path(
    get,
    path = "/crea-cadena",
    responses(
        (status = 200, description = "Chain built", body = ChainResponse),
        (status = 404, description = "No processes stored"),
    ),
    tag = "chain"
)]
pub async fn create_chain(State(state): State<AppState>) -> AppResult<Json<ChainResponse>> {
    let cadena = chain::build_for_all(&state.db).await?.encode();
    let envio = state.avimex_client.forward(&cadena).await;

    Ok(Json(ChainResponse { cadena, envio }))
}

/// Build and send the chain, then remove the rows it contains
///
/// Rows created while the chain is being sent are not part of it and stay.
#[utoipa::path(
    get,
    path = "/clean-database",
    responses(
        (status = 200, description = "Chain sent and database purged", body = CleanDatabaseResponse),
        (status = 404, description = "No processes stored"),
    ),
    tag = "chain"
)]
pub async fn clean_database(
    State(state): State<AppState>,
) -> AppResult<Json<CleanDatabaseResponse>> {
    let exported = chain::build_for_all(&state.db).await?;
    let cadena = exported.encode();
    let envio = state.avimex_client.forward(&cadena).await;
    let eliminados = cascade::purge_exported(&state.db, &exported).await?;

    Ok(Json(CleanDatabaseResponse {
        message: "Database cleaned".to_string(),
        cadena,
        envio,
        eliminados,
    }))
}
