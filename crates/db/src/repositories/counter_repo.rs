//! Repository for the `project_counters` table.

use draftboard_core::error::CoreError;
use draftboard_core::sequence::{advance_counter, validate_owner_id};
use sqlx::{PgConnection, PgExecutor};

use crate::models::counter::ProjectCounter;
use crate::DbError;

const COLUMNS: &str = "owner_id, next_project_number, created_at, updated_at";

/// Attempts before giving up on a counter row that keeps racing into existence.
const MAX_INIT_ATTEMPTS: usize = 2;

/// Allocates per-owner project numbers.
pub struct CounterRepo;

impl CounterRepo {
    /// Fetch an owner's counter without locking it.
    pub async fn find<'e>(
        executor: impl PgExecutor<'e>,
        owner_id: &str,
    ) -> Result<Option<ProjectCounter>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM project_counters WHERE owner_id = $1");
        sqlx::query_as::<_, ProjectCounter>(&query)
            .bind(owner_id)
            .fetch_optional(executor)
            .await
    }

    /// Issue the next number for `owner_id`.
    ///
    /// Must run inside a transaction: the counter row is locked with
    /// `FOR UPDATE` for the rest of it, so concurrent allocations for the same
    /// owner, on any server instance, wait for this one to commit. A first
    /// allocation that loses the race to create the row re-reads it.
    pub async fn allocate(conn: &mut PgConnection, owner_id: &str) -> Result<i64, DbError> {
        validate_owner_id(owner_id)?;

        for _ in 0..MAX_INIT_ATTEMPTS {
            let current: Option<i64> = sqlx::query_scalar(
                "SELECT next_project_number FROM project_counters WHERE owner_id = $1 FOR UPDATE",
            )
            .bind(owner_id)
            .fetch_optional(&mut *conn)
            .await?;

            let allocation = advance_counter(current)?;

            if allocation.created {
                let inserted = sqlx::query(
                    "INSERT INTO project_counters (owner_id, next_project_number)
                     VALUES ($1, $2)
                     ON CONFLICT (owner_id) DO NOTHING",
                )
                .bind(owner_id)
                .bind(allocation.next)
                .execute(&mut *conn)
                .await?;

                if inserted.rows_affected() == 0 {
                    tracing::debug!(owner_id, "Counter row created concurrently, retrying");
                    continue;
                }
            } else {
                sqlx::query(
                    "UPDATE project_counters
                     SET next_project_number = $2, updated_at = NOW()
                     WHERE owner_id = $1",
                )
                .bind(owner_id)
                .bind(allocation.next)
                .execute(&mut *conn)
                .await?;
            }

            return Ok(allocation.issued);
        }

        Err(CoreError::CorruptState("Project counter could not be initialized".into()).into())
    }
}
