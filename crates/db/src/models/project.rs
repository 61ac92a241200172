//! Project entity model and DTOs.

use draftboard_core::types::{DbId, Timestamp, UserId};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A live (not soft-deleted) row from the `projects` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Project {
    pub id: DbId,
    pub owner_id: UserId,
    pub name: String,
    pub project_number: i64,
    pub is_public: bool,
    pub sketch_data: serde_json::Value,
    pub thumbnail: Option<String>,
    /// Serialized JSON; parse with `draftboard_core::project::parse_style_guide`.
    pub style_guide: Option<String>,
    pub moodboard_images: Vec<String>,
    pub created_at: Timestamp,
    pub last_modified: Timestamp,
}

/// Listing projection returned by the per-owner project list.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProjectSummary {
    pub id: DbId,
    pub name: String,
    pub project_number: i64,
    pub thumbnail: Option<String>,
    pub last_modified: Timestamp,
    pub created_at: Timestamp,
    pub is_public: bool,
}

impl From<&Project> for ProjectSummary {
    fn from(p: &Project) -> Self {
        Self {
            id: p.id,
            name: p.name.clone(),
            project_number: p.project_number,
            thumbnail: p.thumbnail.clone(),
            last_modified: p.last_modified,
            created_at: p.created_at,
            is_public: p.is_public,
        }
    }
}

/// Response body for a successful creation.
#[derive(Debug, Clone, Serialize)]
pub struct CreatedProject {
    pub id: DbId,
    pub name: String,
    pub project_number: i64,
    pub last_modified: Timestamp,
    pub created_at: Timestamp,
}

impl From<&Project> for CreatedProject {
    fn from(p: &Project) -> Self {
        Self {
            id: p.id,
            name: p.name.clone(),
            project_number: p.project_number,
            last_modified: p.last_modified,
            created_at: p.created_at,
        }
    }
}

/// Validated input for inserting a project. The number is allocated by the store.
#[derive(Debug, Clone)]
pub struct CreateProject {
    pub owner_id: UserId,
    /// Already trimmed; `None` means "use the default name".
    pub name: Option<String>,
    pub sketch_data: serde_json::Value,
    pub thumbnail: Option<String>,
}

/// DTO for updating project metadata. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProject {
    pub name: Option<String>,
    pub is_public: Option<bool>,
}

/// Auto-save payload: replaces the sketch and optionally the thumbnail.
#[derive(Debug, Clone)]
pub struct SaveSketch {
    pub sketch_data: serde_json::Value,
    pub thumbnail: Option<String>,
}
