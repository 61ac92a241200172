//! PostgreSQL-backed [`ProjectStore`].

use async_trait::async_trait;
use draftboard_core::moodboard::{attach_reference, detach_reference};
use draftboard_core::types::DbId;

use super::ProjectStore;
use crate::models::project::{CreateProject, Project, ProjectSummary, SaveSketch, UpdateProject};
use crate::repositories::{CounterRepo, ProjectRepo};
use crate::{DbError, DbPool};

#[derive(Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

#[async_trait]
impl ProjectStore for PgStore {
    async fn ping(&self) -> Result<(), DbError> {
        crate::health_check(&self.pool).await?;
        Ok(())
    }

    async fn find_project(&self, id: DbId) -> Result<Option<Project>, DbError> {
        Ok(ProjectRepo::find_by_id(&self.pool, id).await?)
    }

    async fn create_project(&self, input: &CreateProject) -> Result<Project, DbError> {
        let mut tx = self.pool.begin().await?;
        let project_number = CounterRepo::allocate(&mut tx, &input.owner_id).await?;
        let project = ProjectRepo::insert(&mut tx, input, project_number).await?;
        tx.commit().await?;

        tracing::info!(
            project_id = project.id,
            owner_id = %project.owner_id,
            project_number,
            "Project created"
        );
        Ok(project)
    }

    async fn list_projects_for_owner(
        &self,
        owner_id: &str,
        limit: i64,
    ) -> Result<Vec<ProjectSummary>, DbError> {
        Ok(ProjectRepo::list_by_owner(&self.pool, owner_id, limit).await?)
    }

    async fn update_project(
        &self,
        id: DbId,
        input: &UpdateProject,
    ) -> Result<Option<Project>, DbError> {
        Ok(ProjectRepo::update(&self.pool, id, input).await?)
    }

    async fn save_sketch(&self, id: DbId, input: &SaveSketch) -> Result<Option<Project>, DbError> {
        Ok(ProjectRepo::save_sketch(&self.pool, id, input).await?)
    }

    async fn set_style_guide(
        &self,
        id: DbId,
        style_guide: Option<String>,
    ) -> Result<Option<Project>, DbError> {
        Ok(ProjectRepo::set_style_guide(&self.pool, id, style_guide.as_deref()).await?)
    }

    async fn attach_moodboard_image(
        &self,
        id: DbId,
        storage_id: &str,
        max_count: usize,
    ) -> Result<Option<Project>, DbError> {
        let mut tx = self.pool.begin().await?;
        let Some(mut images) = ProjectRepo::lock_moodboard(&mut tx, id).await? else {
            return Ok(None);
        };

        let project = if attach_reference(&mut images, storage_id, max_count)? {
            ProjectRepo::set_moodboard(&mut *tx, id, &images).await?
        } else {
            ProjectRepo::find_by_id(&mut *tx, id).await?
        };
        tx.commit().await?;
        Ok(project)
    }

    async fn detach_moodboard_image(
        &self,
        id: DbId,
        storage_id: &str,
    ) -> Result<Option<Project>, DbError> {
        let mut tx = self.pool.begin().await?;
        let Some(mut images) = ProjectRepo::lock_moodboard(&mut tx, id).await? else {
            return Ok(None);
        };

        detach_reference(&mut images, storage_id)?;
        let project = ProjectRepo::set_moodboard(&mut *tx, id, &images).await?;
        tx.commit().await?;
        Ok(project)
    }

    async fn soft_delete_project(&self, id: DbId) -> Result<bool, DbError> {
        Ok(ProjectRepo::soft_delete(&self.pool, id).await?)
    }

    async fn next_project_number(&self, owner_id: &str) -> Result<i64, DbError> {
        let mut tx = self.pool.begin().await?;
        let number = CounterRepo::allocate(&mut tx, owner_id).await?;
        tx.commit().await?;
        Ok(number)
    }

    async fn counter_value(&self, owner_id: &str) -> Result<Option<i64>, DbError> {
        let counter = CounterRepo::find(&self.pool, owner_id).await?;
        Ok(counter.map(|c| c.next_project_number))
    }
}
