use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder};
use std::collections::HashMap;

use super::Chain;
use crate::entity::{procesos, sensores, subprocesos};
use crate::error::{AppError, AppResult};

/// Load a process with its subprocesses and sensors, in primary-key order.
///
/// # Errors
///
/// Returns `AppError::NotFound` if the process does not exist.
pub async fn build_for_process<C: ConnectionTrait>(db: &C, proceso_id: i32) -> AppResult<Chain> {
    let process = procesos::Entity::find_by_id(proceso_id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Process {proceso_id} not found")))?;

    let subprocesses = subprocesos::Entity::find()
        .filter(subprocesos::Column::ProcesoId.eq(proceso_id))
        .order_by_asc(subprocesos::Column::Id)
        .all(db)
        .await?;

    let sensors = sensores::Entity::find()
        .filter(sensores::Column::IdProceso.eq(proceso_id))
        .order_by_asc(sensores::Column::Id)
        .all(db)
        .await?;

    tracing::debug!(
        proceso_id,
        subprocesses = subprocesses.len(),
        sensors = sensors.len(),
        "Built chain for process"
    );

    Ok(Chain::new(process, subprocesses, sensors))
}

/// Chain covering every process in the database, one after another.
///
/// # Errors
///
/// Returns `AppError::NotFound` if there are no processes.
pub async fn build_for_all<C: ConnectionTrait>(db: &C) -> AppResult<Chain> {
    let processes = procesos::Entity::find()
        .order_by_asc(procesos::Column::Id)
        .all(db)
        .await?;

    if processes.is_empty() {
        return Err(AppError::NotFound("No processes available".to_string()));
    }

    let mut subprocesses_by_process: HashMap<i32, Vec<subprocesos::Model>> = HashMap::new();
    for subprocess in subprocesos::Entity::find()
        .order_by_asc(subprocesos::Column::Id)
        .all(db)
        .await?
    {
        subprocesses_by_process
            .entry(subprocess.proceso_id)
            .or_default()
            .push(subprocess);
    }

    // Sensors without a process have no place in the chain
    let mut sensors_by_process: HashMap<i32, Vec<sensores::Model>> = HashMap::new();
    for sensor in sensores::Entity::find()
        .filter(sensores::Column::IdProceso.is_not_null())
        .order_by_asc(sensores::Column::Id)
        .all(db)
        .await?
    {
        if let Some(proceso_id) = sensor.id_proceso {
            sensors_by_process.entry(proceso_id).or_default().push(sensor);
        }
    }

    let mut chain = Chain::default();
    for process in processes {
        let id = process.id;
        chain.append(Chain::new(
            process,
            subprocesses_by_process.remove(&id).unwrap_or_default(),
            sensors_by_process.remove(&id).unwrap_or_default(),
        ));
    }

    Ok(chain)
}
