//! The storage seam used by the HTTP layer.
//!
//! [`ProjectStore`] names every persistence operation the service needs,
//! each as one atomic unit. Two backends implement it:
//!
//! - [`pg::PgStore`] -- PostgreSQL via the repositories; multi-instance safe.
//! - [`memory::MemoryStore`] -- single-process, for local development and tests.

use async_trait::async_trait;
use draftboard_core::types::DbId;

use crate::models::project::{CreateProject, Project, ProjectSummary, SaveSketch, UpdateProject};
use crate::DbError;

pub mod memory;
pub mod pg;

pub use memory::MemoryStore;
pub use pg::PgStore;

#[async_trait]
pub trait ProjectStore: Send + Sync {
    /// Check the backend is reachable.
    async fn ping(&self) -> Result<(), DbError>;

    /// Fetch a live project.
    async fn find_project(&self, id: DbId) -> Result<Option<Project>, DbError>;

    /// Allocate the owner's next number and insert the project, atomically.
    async fn create_project(&self, input: &CreateProject) -> Result<Project, DbError>;

    /// An owner's live projects, most recently modified first, at most `limit`.
    async fn list_projects_for_owner(
        &self,
        owner_id: &str,
        limit: i64,
    ) -> Result<Vec<ProjectSummary>, DbError>;

    async fn update_project(
        &self,
        id: DbId,
        input: &UpdateProject,
    ) -> Result<Option<Project>, DbError>;

    async fn save_sketch(&self, id: DbId, input: &SaveSketch) -> Result<Option<Project>, DbError>;

    async fn set_style_guide(
        &self,
        id: DbId,
        style_guide: Option<String>,
    ) -> Result<Option<Project>, DbError>;

    /// Append a reference unless present; fails with `LimitExceeded` at `max_count`.
    async fn attach_moodboard_image(
        &self,
        id: DbId,
        storage_id: &str,
        max_count: usize,
    ) -> Result<Option<Project>, DbError>;

    /// Remove a reference; fails with `NotFound` if it is not on the board.
    async fn detach_moodboard_image(
        &self,
        id: DbId,
        storage_id: &str,
    ) -> Result<Option<Project>, DbError>;

    /// Remove a project from the active set. Counters are untouched.
    async fn soft_delete_project(&self, id: DbId) -> Result<bool, DbError>;

    /// Issue the owner's next project number without creating a project.
    async fn next_project_number(&self, owner_id: &str) -> Result<i64, DbError>;

    /// Current `next_project_number` for an owner, if a counter exists.
    async fn counter_value(&self, owner_id: &str) -> Result<Option<i64>, DbError>;
}
