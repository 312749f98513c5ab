use sea_orm::{ConnectionTrait, EntityTrait, PaginatorTrait, QuerySelect};

use crate::entity::procesos;
use crate::error::{AppError, AppResult};

/// Fetch a process by id.
///
/// # Errors
///
/// Returns `AppError::NotFound` if no process has this id.
pub async fn find_process<C: ConnectionTrait>(db: &C, id: i32) -> AppResult<procesos::Model> {
    procesos::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Process {id} not found")))
}

/// The one process the system is expected to hold.
///
/// Returns `Ok(None)` when no process exists yet.
///
/// # Errors
///
/// Returns `AppError::Consistency` if more than one process exists.
pub async fn current_process<C: ConnectionTrait>(db: &C) -> AppResult<Option<procesos::Model>> {
    // Two rows are enough to detect ambiguity
    let mut rows = procesos::Entity::find().limit(2).all(db).await?;
    if rows.len() > 1 {
        let total = procesos::Entity::find().count(db).await?;
        return Err(AppError::Consistency(format!(
            "Expected a single process, found {total}"
        )));
    }
    Ok(rows.pop())
}

/// Like [`current_process`], but a missing process is also an error.
///
/// # Errors
///
/// Returns `AppError::Consistency` unless exactly one process exists.
pub async fn single_process<C: ConnectionTrait>(db: &C) -> AppResult<procesos::Model> {
    current_process(db)
        .await?
        .ok_or_else(|| AppError::Consistency("Expected a single process, found 0".to_string()))
}
