//! Repository for the `projects` table.

use draftboard_core::project::resolve_project_name;
use draftboard_core::types::DbId;
use sqlx::{PgConnection, PgExecutor};

use crate::models::project::{CreateProject, Project, ProjectSummary, SaveSketch, UpdateProject};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, owner_id, name, project_number, is_public, sketch_data, thumbnail, \
                       style_guide, moodboard_images, created_at, last_modified";

const SUMMARY_COLUMNS: &str =
    "id, name, project_number, thumbnail, last_modified, created_at, is_public";

/// Provides CRUD operations for projects. Soft-deleted rows are invisible
/// to every read.
pub struct ProjectRepo;

impl ProjectRepo {
    /// Insert a project carrying an already-allocated number.
    ///
    /// Projects start private. Call inside the transaction that allocated
    /// `project_number` so a failed insert also rolls the counter back.
    pub async fn insert(
        conn: &mut PgConnection,
        input: &CreateProject,
        project_number: i64,
    ) -> Result<Project, sqlx::Error> {
        let name = resolve_project_name(input.name.clone(), project_number);
        let query = format!(
            "INSERT INTO projects (owner_id, name, project_number, is_public, sketch_data, thumbnail)
             VALUES ($1, $2, $3, FALSE, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(&input.owner_id)
            .bind(name)
            .bind(project_number)
            .bind(&input.sketch_data)
            .bind(&input.thumbnail)
            .fetch_one(conn)
            .await
    }

    /// Find a live project by its internal ID.
    pub async fn find_by_id<'e>(
        executor: impl PgExecutor<'e>,
        id: DbId,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects WHERE id = $1 AND deleted_at IS NULL");
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Read a live project's mood-board list and lock the row until commit.
    pub async fn lock_moodboard(
        conn: &mut PgConnection,
        id: DbId,
    ) -> Result<Option<Vec<String>>, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT moodboard_images FROM projects WHERE id = $1 AND deleted_at IS NULL FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(conn)
        .await
    }

    /// List an owner's live projects, most recently modified first.
    pub async fn list_by_owner<'e>(
        executor: impl PgExecutor<'e>,
        owner_id: &str,
        limit: i64,
    ) -> Result<Vec<ProjectSummary>, sqlx::Error> {
        let query = format!(
            "SELECT {SUMMARY_COLUMNS} FROM projects
             WHERE owner_id = $1 AND deleted_at IS NULL
             ORDER BY last_modified DESC, id DESC
             LIMIT $2"
        );
        sqlx::query_as::<_, ProjectSummary>(&query)
            .bind(owner_id)
            .bind(limit)
            .fetch_all(executor)
            .await
    }

    /// Update name and/or visibility. Only non-`None` fields are applied.
    ///
    /// Returns `None` if no live row with the given `id` exists.
    pub async fn update<'e>(
        executor: impl PgExecutor<'e>,
        id: DbId,
        input: &UpdateProject,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!(
            "UPDATE projects SET
                name = COALESCE($2, name),
                is_public = COALESCE($3, is_public),
                last_modified = NOW()
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(input.is_public)
            .fetch_optional(executor)
            .await
    }

    /// Replace the sketch payload; the thumbnail is kept when not supplied.
    pub async fn save_sketch<'e>(
        executor: impl PgExecutor<'e>,
        id: DbId,
        input: &SaveSketch,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!(
            "UPDATE projects SET
                sketch_data = $2,
                thumbnail = COALESCE($3, thumbnail),
                last_modified = NOW()
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(&input.sketch_data)
            .bind(&input.thumbnail)
            .fetch_optional(executor)
            .await
    }

    /// Store (or clear, with `None`) the serialized style guide.
    pub async fn set_style_guide<'e>(
        executor: impl PgExecutor<'e>,
        id: DbId,
        style_guide: Option<&str>,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!(
            "UPDATE projects SET style_guide = $2, last_modified = NOW()
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(style_guide)
            .fetch_optional(executor)
            .await
    }

    /// Overwrite the mood-board list.
    pub async fn set_moodboard<'e>(
        executor: impl PgExecutor<'e>,
        id: DbId,
        images: &[String],
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!(
            "UPDATE projects SET moodboard_images = $2, last_modified = NOW()
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(images)
            .fetch_optional(executor)
            .await
    }

    /// Soft-delete a project by ID. Returns `true` if a row was marked deleted.
    ///
    /// The owner's counter is not touched, so the number is never reissued.
    pub async fn soft_delete<'e>(
        executor: impl PgExecutor<'e>,
        id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE projects SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(executor)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
