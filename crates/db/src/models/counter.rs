//! Per-owner project counter model.

use draftboard_core::types::{Timestamp, UserId};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `project_counters` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProjectCounter {
    pub owner_id: UserId,
    /// Number the owner's next project receives.
    pub next_project_number: i64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
