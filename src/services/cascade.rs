//! Multi-table writes that must succeed or fail as a whole.

use sea_orm::{
    sea_query::Expr, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QuerySelect,
    TransactionTrait,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::avimex::{AvimexClient, ForwardReport};
use crate::chain::{self, Chain, ChainRecord};
use crate::entity::{procesos, sensores, subprocesos};
use crate::error::{AppError, AppResult};

/// Rows removed by a cascading delete or purge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct DeletedRows {
    pub procesos: u64,
    pub subprocesos: u64,
    pub sensores: u64,
}

/// Delete a process after its sensors and subprocesses.
///
/// # Errors
///
/// Returns `AppError::NotFound` if the process does not exist; the child
/// deletes are rolled back in that case.
pub async fn delete_process(db: &DatabaseConnection, id: i32) -> AppResult<DeletedRows> {
    let txn = db.begin().await?;

    let sensors = sensores::Entity::delete_many()
        .filter(sensores::Column::IdProceso.eq(id))
        .exec(&txn)
        .await?;

    let subprocesses = subprocesos::Entity::delete_many()
        .filter(subprocesos::Column::ProcesoId.eq(id))
        .exec(&txn)
        .await?;

    let process = procesos::Entity::delete_by_id(id).exec(&txn).await?;

    if process.rows_affected == 0 {
        txn.rollback().await?;
        return Err(AppError::NotFound(format!("Process {id} not found")));
    }

    txn.commit().await?;

    let deleted = DeletedRows {
        procesos: process.rows_affected,
        subprocesos: subprocesses.rows_affected,
        sensores: sensors.rows_affected,
    };
    tracing::info!(proceso_id = id, ?deleted, "Process deleted with dependents");

    Ok(deleted)
}

/// Result of a subprocess status change.
pub struct StatusUpdate {
    pub proceso_id: i32,
    pub chain: Chain,
    pub envio: ForwardReport,
}

/// Set a subprocess status, rebuild its process chain and forward it.
///
/// The status change and chain rebuild commit together. Forwarding happens
/// after the commit, and its failure is reported, not rolled back.
///
/// # Errors
///
/// Returns `AppError::NotFound` if the subprocess does not exist.
pub async fn update_subprocess_status(
    db: &DatabaseConnection,
    avimex: &AvimexClient,
    id: i32,
    estatus: &str,
) -> AppResult<StatusUpdate> {
    let txn = db.begin().await?;

    let updated = subprocesos::Entity::update_many()
        .col_expr(subprocesos::Column::Estatus, Expr::value(estatus))
        .filter(subprocesos::Column::Id.eq(id))
        .exec(&txn)
        .await?;

    if updated.rows_affected == 0 {
        return Err(AppError::NotFound(format!("Subprocess {id} not found")));
    }

    let subprocess = subprocesos::Entity::find_by_id(id)
        .one(&txn)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Subprocess {id} not found")))?;

    let chain = chain::build_for_process(&txn, subprocess.proceso_id).await?;
    txn.commit().await?;

    tracing::info!(
        subproceso_id = id,
        proceso_id = subprocess.proceso_id,
        estatus,
        "Subprocess status updated"
    );

    let envio = avimex.forward(&chain.encode()).await;

    Ok(StatusUpdate {
        proceso_id: subprocess.proceso_id,
        chain,
        envio,
    })
}

/// Remove the rows a chain was built from, in one transaction.
///
/// Rows written after the chain was built are kept. So is an exported
/// process that gained a child in the meantime, since deleting it would
/// orphan that child.
///
/// # Errors
///
/// Returns `AppError::Database` if any delete fails; nothing is removed then.
pub async fn purge_exported(db: &DatabaseConnection, chain: &Chain) -> AppResult<DeletedRows> {
    let mut process_ids = Vec::new();
    let mut subprocess_ids = Vec::new();
    let mut sensor_ids = Vec::new();
    for record in chain.records() {
        match record {
            ChainRecord::Process(p) => process_ids.push(p.id),
            ChainRecord::Subprocess(s) => subprocess_ids.push(s.id),
            ChainRecord::Sensor(s) => sensor_ids.push(s.id),
        }
    }

    let txn = db.begin().await?;

    let sensors = sensores::Entity::delete_many()
        .filter(sensores::Column::Id.is_in(sensor_ids))
        .exec(&txn)
        .await?;
    let subprocesses = subprocesos::Entity::delete_many()
        .filter(subprocesos::Column::Id.is_in(subprocess_ids))
        .exec(&txn)
        .await?;

    let mut still_referenced: Vec<i32> = subprocesos::Entity::find()
        .select_only()
        .column(subprocesos::Column::ProcesoId)
        .filter(subprocesos::Column::ProcesoId.is_in(process_ids.clone()))
        .into_tuple()
        .all(&txn)
        .await?;
    let sensor_parents: Vec<Option<i32>> = sensores::Entity::find()
        .select_only()
        .column(sensores::Column::IdProceso)
        .filter(sensores::Column::IdProceso.is_in(process_ids.clone()))
        .into_tuple()
        .all(&txn)
        .await?;
    still_referenced.extend(sensor_parents.into_iter().flatten());
    process_ids.retain(|id| !still_referenced.contains(id));

    let processes = procesos::Entity::delete_many()
        .filter(procesos::Column::Id.is_in(process_ids))
        .exec(&txn)
        .await?;

    txn.commit().await?;

    if !still_referenced.is_empty() {
        still_referenced.sort_unstable();
        still_referenced.dedup();
        tracing::warn!(
            kept = ?still_referenced,
            "Processes gained rows after export and were kept"
        );
    }

    let deleted = DeletedRows {
        procesos: processes.rows_affected,
        subprocesos: subprocesses.rows_affected,
        sensores: sensors.rows_affected,
    };
    tracing::info!(?deleted, "Exported rows purged");

    Ok(deleted)
}
