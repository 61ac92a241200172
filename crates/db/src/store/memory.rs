//! In-process [`ProjectStore`] for local development and tests.
//!
//! All state sits behind one `RwLock`; every operation takes the lock for
//! its whole duration, which makes each call a serialized transaction. This
//! only holds within a single process, so deployments with more than one
//! server instance must use [`super::PgStore`].

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use chrono::Utc;
use draftboard_core::moodboard::{attach_reference, detach_reference};
use draftboard_core::project::resolve_project_name;
use draftboard_core::sequence::{advance_counter, validate_owner_id};
use draftboard_core::types::{DbId, UserId};
use tokio::sync::RwLock;

use super::ProjectStore;
use crate::models::project::{CreateProject, Project, ProjectSummary, SaveSketch, UpdateProject};
use crate::DbError;

struct StoredProject {
    project: Project,
    deleted: bool,
}

#[derive(Default)]
struct MemoryState {
    projects: BTreeMap<DbId, StoredProject>,
    counters: HashMap<UserId, i64>,
    last_id: DbId,
}

impl MemoryState {
    fn allocate(&mut self, owner_id: &str) -> Result<i64, DbError> {
        validate_owner_id(owner_id)?;
        let allocation = advance_counter(self.counters.get(owner_id).copied())?;
        self.counters.insert(owner_id.to_string(), allocation.next);
        Ok(allocation.issued)
    }

    fn live_mut(&mut self, id: DbId) -> Option<&mut Project> {
        self.projects
            .get_mut(&id)
            .filter(|stored| !stored.deleted)
            .map(|stored| &mut stored.project)
    }
}

#[derive(Default)]
pub struct MemoryStore {
    state: RwLock<MemoryState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite an owner's counter, bypassing allocation.
    ///
    /// Lets tests reproduce counters left behind by imports or manual edits.
    pub async fn seed_counter(&self, owner_id: &str, next_project_number: i64) {
        self.state
            .write()
            .await
            .counters
            .insert(owner_id.to_string(), next_project_number);
    }

    /// Overwrite a project's stored style guide text without validation.
    pub async fn seed_style_guide(&self, id: DbId, raw: &str) -> bool {
        let mut state = self.state.write().await;
        match state.live_mut(id) {
            Some(project) => {
                project.style_guide = Some(raw.to_string());
                true
            }
            None => false,
        }
    }

    /// Overwrite a project's mood-board list without enforcing the cap.
    pub async fn seed_moodboard(&self, id: DbId, images: Vec<String>) -> bool {
        let mut state = self.state.write().await;
        match state.live_mut(id) {
            Some(project) => {
                project.moodboard_images = images;
                true
            }
            None => false,
        }
    }
}

#[async_trait]
impl ProjectStore for MemoryStore {
    async fn ping(&self) -> Result<(), DbError> {
        Ok(())
    }

    async fn find_project(&self, id: DbId) -> Result<Option<Project>, DbError> {
        let state = self.state.read().await;
        Ok(state
            .projects
            .get(&id)
            .filter(|stored| !stored.deleted)
            .map(|stored| stored.project.clone()))
    }

    async fn create_project(&self, input: &CreateProject) -> Result<Project, DbError> {
        let mut state = self.state.write().await;
        let project_number = state.allocate(&input.owner_id)?;

        state.last_id += 1;
        let now = Utc::now();
        let project = Project {
            id: state.last_id,
            owner_id: input.owner_id.clone(),
            name: resolve_project_name(input.name.clone(), project_number),
            project_number,
            is_public: false,
            sketch_data: input.sketch_data.clone(),
            thumbnail: input.thumbnail.clone(),
            style_guide: None,
            moodboard_images: Vec::new(),
            created_at: now,
            last_modified: now,
        };
        state.projects.insert(
            project.id,
            StoredProject {
                project: project.clone(),
                deleted: false,
            },
        );

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
        let state = self.state.read().await;
        let mut projects: Vec<&Project> = state
            .projects
            .values()
            .filter(|stored| !stored.deleted && stored.project.owner_id == owner_id)
            .map(|stored| &stored.project)
            .collect();
        projects.sort_by(|a, b| {
            b.last_modified
                .cmp(&a.last_modified)
                .then_with(|| b.id.cmp(&a.id))
        });
        let limit = usize::try_from(limit).unwrap_or(0);
        Ok(projects
            .into_iter()
            .take(limit)
            .map(ProjectSummary::from)
            .collect())
    }

    async fn update_project(
        &self,
        id: DbId,
        input: &UpdateProject,
    ) -> Result<Option<Project>, DbError> {
        let mut state = self.state.write().await;
        let Some(project) = state.live_mut(id) else {
            return Ok(None);
        };
        if let Some(name) = &input.name {
            project.name = name.clone();
        }
        if let Some(is_public) = input.is_public {
            project.is_public = is_public;
        }
        project.last_modified = Utc::now();
        Ok(Some(project.clone()))
    }

    async fn save_sketch(&self, id: DbId, input: &SaveSketch) -> Result<Option<Project>, DbError> {
        let mut state = self.state.write().await;
        let Some(project) = state.live_mut(id) else {
            return Ok(None);
        };
        project.sketch_data = input.sketch_data.clone();
        if let Some(thumbnail) = &input.thumbnail {
            project.thumbnail = Some(thumbnail.clone());
        }
        project.last_modified = Utc::now();
        Ok(Some(project.clone()))
    }

    async fn set_style_guide(
        &self,
        id: DbId,
        style_guide: Option<String>,
    ) -> Result<Option<Project>, DbError> {
        let mut state = self.state.write().await;
        let Some(project) = state.live_mut(id) else {
            return Ok(None);
        };
        project.style_guide = style_guide;
        project.last_modified = Utc::now();
        Ok(Some(project.clone()))
    }

    async fn attach_moodboard_image(
        &self,
        id: DbId,
        storage_id: &str,
        max_count: usize,
    ) -> Result<Option<Project>, DbError> {
        let mut state = self.state.write().await;
        let Some(project) = state.live_mut(id) else {
            return Ok(None);
        };
        if attach_reference(&mut project.moodboard_images, storage_id, max_count)? {
            project.last_modified = Utc::now();
        }
        Ok(Some(project.clone()))
    }

    async fn detach_moodboard_image(
        &self,
        id: DbId,
        storage_id: &str,
    ) -> Result<Option<Project>, DbError> {
        let mut state = self.state.write().await;
        let Some(project) = state.live_mut(id) else {
            return Ok(None);
        };
        detach_reference(&mut project.moodboard_images, storage_id)?;
        project.last_modified = Utc::now();
        Ok(Some(project.clone()))
    }

    async fn soft_delete_project(&self, id: DbId) -> Result<bool, DbError> {
        let mut state = self.state.write().await;
        match state.projects.get_mut(&id) {
            Some(stored) if !stored.deleted => {
                stored.deleted = true;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn next_project_number(&self, owner_id: &str) -> Result<i64, DbError> {
        self.state.write().await.allocate(owner_id)
    }

    async fn counter_value(&self, owner_id: &str) -> Result<Option<i64>, DbError> {
        Ok(self.state.read().await.counters.get(owner_id).copied())
    }
}
