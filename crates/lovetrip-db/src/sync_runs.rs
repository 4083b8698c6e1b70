//! Database operations for the `sync_runs` table.
//!
//! One row per orchestrator invocation: created as `running` when the run
//! starts, finalized to `completed` or `failed` when it ends. Status
//! transitions are guarded so a finished run cannot be finalized twice.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::DbError;

const SYNC_RUN_COLUMNS: &str = "id, public_id, trigger_source, status, started_at, completed_at, \
     items_inserted, items_updated, items_errors, duration_seconds, error_message, logs, created_at";

/// A row from the `sync_runs` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SyncRunRow {
    pub id: i64,
    pub public_id: Uuid,
    pub trigger_source: String,
    pub status: String,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub items_inserted: i32,
    pub items_updated: i32,
    pub items_errors: i32,
    pub duration_seconds: Option<f64>,
    pub error_message: Option<String>,
    pub logs: Vec<String>,
    pub created_at: DateTime<Utc>,
}

/// Final counters and transcript recorded when a run ends.
#[derive(Debug, Clone, Default)]
pub struct SyncRunOutcome {
    pub items_inserted: i32,
    pub items_updated: i32,
    pub items_errors: i32,
    pub duration_seconds: f64,
    /// Bounded tail of the run transcript; the orchestrator keeps the last
    /// 100 lines.
    pub logs: Vec<String>,
}

/// Creates a new sync run in `running` status with `started_at = NOW()`.
///
/// Generates a UUID in Rust and binds it to `public_id`. Returns the full
/// newly-created row.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert fails.
pub async fn create_sync_run(pool: &PgPool, trigger_source: &str) -> Result<SyncRunRow, DbError> {
    let public_id = Uuid::new_v4();

    let row = sqlx::query_as::<_, SyncRunRow>(&format!(
        "INSERT INTO sync_runs (public_id, trigger_source, status, started_at) \
         VALUES ($1, $2, 'running', NOW()) \
         RETURNING {SYNC_RUN_COLUMNS}"
    ))
    .bind(public_id)
    .bind(trigger_source)
    .fetch_one(pool)
    .await?;

    Ok(row)
}

/// Marks a run as `completed` and records its final counters.
///
/// # Errors
///
/// Returns [`DbError::InvalidSyncRunTransition`] if the run is not currently
/// `running`, or [`DbError::Sqlx`] if the update fails.
pub async fn complete_sync_run(
    pool: &PgPool,
    id: i64,
    outcome: &SyncRunOutcome,
) -> Result<(), DbError> {
    let result = sqlx::query(
        "UPDATE sync_runs \
         SET status = 'completed', completed_at = NOW(), \
             items_inserted = $1, items_updated = $2, items_errors = $3, \
             duration_seconds = $4, logs = $5 \
         WHERE id = $6 AND status = 'running'",
    )
    .bind(outcome.items_inserted)
    .bind(outcome.items_updated)
    .bind(outcome.items_errors)
    .bind(outcome.duration_seconds)
    .bind(&outcome.logs)
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::InvalidSyncRunTransition {
            id,
            expected_status: "running",
        });
    }

    Ok(())
}

/// Marks a run as `failed` with an error message and its final counters.
///
/// # Errors
///
/// Returns [`DbError::InvalidSyncRunTransition`] if the run is not currently
/// `running`, or [`DbError::Sqlx`] if the update fails.
pub async fn fail_sync_run(
    pool: &PgPool,
    id: i64,
    outcome: &SyncRunOutcome,
    error_message: &str,
) -> Result<(), DbError> {
    let result = sqlx::query(
        "UPDATE sync_runs \
         SET status = 'failed', completed_at = NOW(), \
             items_inserted = $1, items_updated = $2, items_errors = $3, \
             duration_seconds = $4, error_message = $5, logs = $6 \
         WHERE id = $7 AND status = 'running'",
    )
    .bind(outcome.items_inserted)
    .bind(outcome.items_updated)
    .bind(outcome.items_errors)
    .bind(outcome.duration_seconds)
    .bind(error_message)
    .bind(&outcome.logs)
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::InvalidSyncRunTransition {
            id,
            expected_status: "running",
        });
    }

    Ok(())
}

/// Fetches a single run by its internal `id`.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if no row exists with the given `id`, or
/// [`DbError::Sqlx`] if the query fails.
pub async fn get_sync_run(pool: &PgPool, id: i64) -> Result<SyncRunRow, DbError> {
    let row = sqlx::query_as::<_, SyncRunRow>(&format!(
        "SELECT {SYNC_RUN_COLUMNS} FROM sync_runs WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or(DbError::NotFound)?;

    Ok(row)
}

/// Returns the most recent `limit` runs, ordered by `created_at DESC`.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_sync_runs(pool: &PgPool, limit: i64) -> Result<Vec<SyncRunRow>, DbError> {
    let rows = sqlx::query_as::<_, SyncRunRow>(&format!(
        "SELECT {SYNC_RUN_COLUMNS} FROM sync_runs \
         ORDER BY created_at DESC, id DESC \
         LIMIT $1"
    ))
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
