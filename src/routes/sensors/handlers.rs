use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use sea_orm::{ActiveModelTrait, DbErr, EntityTrait, QueryOrder, QuerySelect, Set};

use crate::common::AppState;
use crate::entity::sensores;
use crate::error::{AppError, AppResult};
use crate::routes::extract::{ApiJson, ApiPath};
use crate::routes::MessageResponse;
use crate::services::sensor_cap::{self, NewSensor, MAX_SENSORS};
use crate::services::lookup;

use super::types::{SensorBatch, SensorCountResponse, SensorPayload, SensorResponse};

/// List all sensors
#[utoipa::path(
    get,
    path = "/sensores",
    responses(
        (status = 200, description = "Sensors retrieved successfully", body = Vec<SensorResponse>),
    ),
    tag = "sensors"
)]
pub async fn list_sensors(State(state): State<AppState>) -> AppResult<Json<Vec<SensorResponse>>> {
    let sensors = sensores::Entity::find()
        .order_by_asc(sensores::Column::Id)
        .all(&state.db)
        .await?;

    Ok(Json(sensors.into_iter().map(Into::into).collect()))
}

/// Create one sensor or a batch of sensors
///
/// The whole batch is rejected if any item is invalid or if it would take
/// the stored sensor count past the limit.
#[utoipa::path(
    post,
    path = "/sensores",
    request_body = SensorBatch,
    responses(
        (status = 201, description = "Sensor(s) created", body = SensorResponse),
        (status = 400, description = "Invalid payload or sensor limit reached"),
        (status = 404, description = "Referenced process not found"),
        (status = 409, description = "No single process to attach the sensor to"),
    ),
    tag = "sensors"
)]
pub async fn create_sensors(
    State(state): State<AppState>,
    ApiJson(batch): ApiJson<SensorBatch>,
) -> AppResult<Response> {
    let (payloads, single) = match batch {
        SensorBatch::One(payload) => (vec![payload], true),
        SensorBatch::Many(payloads) => (payloads, false),
    };

    if payloads.is_empty() {
        return Err(AppError::BadRequest("No sensors to create".to_string()));
    }

    let batch = payloads
        .into_iter()
        .enumerate()
        .map(|(index, payload)| {
            let id_proceso = payload.id_proceso;
            payload
                .into_active_model()
                .map(|model| NewSensor { id_proceso, model })
                .map_err(|e| if single { e } else { e.at_item(index) })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let created: Vec<SensorResponse> = sensor_cap::insert_sensors(&state.db, batch)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();

    if single {
        let sensor = created
            .into_iter()
            .next()
            .ok_or_else(|| AppError::Internal("Sensor insert returned no row".to_string()))?;
        return Ok((StatusCode::CREATED, Json(sensor)).into_response());
    }

    Ok((StatusCode::CREATED, Json(created)).into_response())
}

/// Comma-separated list of stored MAC addresses
#[utoipa::path(
    get,
    path = "/sensores/macaddresses",
    responses(
        (status = 200, description = "MAC addresses joined by \", \"", body = String, content_type = "text/plain"),
        (status = 404, description = "No sensors stored"),
    ),
    tag = "sensors"
)]
pub async fn list_mac_addresses(State(state): State<AppState>) -> AppResult<Response> {
    let addresses: Vec<String> = sensores::Entity::find()
        .select_only()
        .column(sensores::Column::MacAddress)
        .order_by_asc(sensores::Column::Id)
        .into_tuple()
        .all(&state.db)
        .await?;

    if addresses.is_empty() {
        return Err(AppError::NotFound("No sensors with MAC addresses".to_string()));
    }

    Ok((
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        addresses.join(", "),
    )
        .into_response())
}

/// Current number of sensors; 400 once the limit is reached
#[utoipa::path(
    get,
    path = "/cantidad-sensores",
    responses(
        (status = 200, description = "Room for more sensors", body = SensorCountResponse),
        (status = 400, description = "Sensor limit reached"),
    ),
    tag = "sensors"
)]
pub async fn count_sensors(State(state): State<AppState>) -> AppResult<Json<SensorCountResponse>> {
    let cantidad = sensor_cap::sensor_count(&state.db).await?;
    sensor_cap::check_capacity(cantidad, 1)?;

    Ok(Json(SensorCountResponse {
        cantidad,
        limite: MAX_SENSORS,
    }))
}

/// Get a sensor by ID
#[utoipa::path(
    get,
    path = "/sensores/{id}",
    params(("id" = i32, Path, description = "Sensor ID")),
    responses(
        (status = 200, description = "Sensor retrieved successfully", body = SensorResponse),
        (status = 404, description = "Sensor not found"),
    ),
    tag = "sensors"
)]
pub async fn get_sensor(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> AppResult<Json<SensorResponse>> {
    let sensor = sensores::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Sensor {id} not found")))?;

    Ok(Json(sensor.into()))
}

/// Update a sensor in place
///
/// The sensor keeps its process unless the body names another one.
#[utoipa::path(
    put,
    path = "/sensores/{id}",
    params(("id" = i32, Path, description = "Sensor ID")),
    request_body = SensorPayload,
    responses(
        (status = 200, description = "Sensor updated", body = SensorResponse),
        (status = 400, description = "Invalid payload"),
        (status = 404, description = "Sensor or process not found"),
    ),
    tag = "sensors"
)]
pub async fn update_sensor(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
    ApiJson(payload): ApiJson<SensorPayload>,
) -> AppResult<Json<SensorResponse>> {
    let id_proceso = payload.id_proceso;
    let mut model = payload.into_active_model()?;
    model.id = Set(id);

    if let Some(proceso_id) = id_proceso {
        lookup::find_process(&state.db, proceso_id).await?;
        model.id_proceso = Set(Some(proceso_id));
    }

    let sensor = model.update(&state.db).await.map_err(|e| match e {
        DbErr::RecordNotUpdated => AppError::NotFound(format!("Sensor {id} not found")),
        other => other.into(),
    })?;

    tracing::info!(id, "Sensor updated");

    Ok(Json(sensor.into()))
}

/// Delete a sensor
#[utoipa::path(
    delete,
    path = "/sensores/{id}",
    params(("id" = i32, Path, description = "Sensor ID")),
    responses(
        (status = 200, description = "Sensor deleted", body = MessageResponse),
        (status = 404, description = "Sensor not found"),
    ),
    tag = "sensors"
)]
pub async fn delete_sensor(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> AppResult<Json<MessageResponse>> {
    let result = sensores::Entity::delete_by_id(id).exec(&state.db).await?;

    if result.rows_affected == 0 {
        return Err(AppError::NotFound(format!("Sensor {id} not found")));
    }

    Ok(Json(MessageResponse::new("Sensor deleted")))
}

/// Delete every sensor
#[utoipa::path(
    delete,
    path = "/sensores",
    responses(
        (status = 200, description = "All sensors deleted", body = MessageResponse),
        (status = 404, description = "No sensors stored"),
    ),
    tag = "sensors"
)]
pub async fn delete_all_sensors(State(state): State<AppState>) -> AppResult<Json<MessageResponse>> {
    let result = sensores::Entity::delete_many().exec(&state.db).await?;

    if result.rows_affected == 0 {
        return Err(AppError::NotFound("No sensors to delete".to_string()));
    }

    tracing::info!(deleted = result.rows_affected, "All sensors deleted");

    Ok(Json(MessageResponse::new(format!(
        "{} sensors deleted",
        result.rows_affected
    ))))
}
