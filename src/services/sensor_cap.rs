//! Hard ceiling on the number of stored sensors.
//!
//! The count and the inserts run in one transaction, which makes a batch
//! all-or-nothing. It does not serialize concurrent requests: two batches
//! that read the count at the same time can both pass and together exceed
//! the limit.

use sea_orm::{
    ActiveModelTrait, ConnectionTrait, EntityTrait, PaginatorTrait, Set, TransactionTrait,
};

use crate::entity::sensores;
use crate::error::{AppError, AppResult};
use crate::services::lookup;

pub const MAX_SENSORS: u64 = 12;

/// Check that `requested` more sensors fit next to `existing` ones.
///
/// # Errors
///
/// Returns `AppError::CapacityExceeded` if the total would pass [`MAX_SENSORS`].
pub fn check_capacity(existing: u64, requested: u64) -> AppResult<()> {
    if existing + requested > MAX_SENSORS {
        return Err(AppError::CapacityExceeded {
            existing,
            requested,
            limit: MAX_SENSORS,
        });
    }
    Ok(())
}

pub async fn sensor_count<C: ConnectionTrait>(db: &C) -> AppResult<u64> {
    Ok(sensores::Entity::find().count(db).await?)
}

/// A sensor ready to insert, with the process it was explicitly assigned to.
pub struct NewSensor {
    pub id_proceso: Option<i32>,
    pub model: sensores::ActiveModel,
}

/// Insert a batch of sensors if all of them fit under the cap.
///
/// Sensors without an explicit process are attached to the single existing
/// process.
///
/// # Errors
///
/// Returns `AppError::CapacityExceeded` when the batch does not fit,
/// `AppError::NotFound` for an explicit process that does not exist, and
/// `AppError::Consistency` when an implicit process is needed but there is
/// not exactly one. Nothing is inserted in any of these cases.
pub async fn insert_sensors<C: TransactionTrait>(
    db: &C,
    batch: Vec<NewSensor>,
) -> AppResult<Vec<sensores::Model>> {
    let txn = db.begin().await?;

    let existing = sensor_count(&txn).await?;
    check_capacity(existing, batch.len() as u64)?;

    let mut implicit_process: Option<i32> = None;
    let mut inserted = Vec::with_capacity(batch.len());

    for NewSensor { id_proceso, mut model } in batch {
        let target = match id_proceso {
            Some(id) => lookup::find_process(&txn, id).await?.id,
            None => match implicit_process {
                Some(id) => id,
                None => {
                    let id = lookup::single_process(&txn).await?.id;
                    implicit_process = Some(id);
                    id
                }
            },
        };

        model.id_proceso = Set(Some(target));
        inserted.push(model.insert(&txn).await?);
    }

    txn.commit().await?;

    tracing::info!(
        created = inserted.len(),
        total = existing + inserted.len() as u64,
        "Sensors created"
    );

    Ok(inserted)
}
