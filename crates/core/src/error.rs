use serde::Serialize;

use crate::types::DbId;

/// Coarse severity attached to every domain error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoreError {
    #[error("Unauthenticated: {0}")]
    Unauthenticated(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Limit exceeded: {0}")]
    LimitExceeded(String),

    #[error("Corrupt state: {0}")]
    CorruptState(String),
}

impl CoreError {
    /// Shorthand for a missing project, the most common lookup failure.
    pub fn project_not_found(id: DbId) -> Self {
        CoreError::NotFound {
            entity: "Project",
            id: id.to_string(),
        }
    }

    /// Machine-readable error code, stable across releases.
    pub fn code(&self) -> &'static str {
        match self {
            CoreError::Unauthenticated(_) => "UNAUTHENTICATED",
            CoreError::Forbidden(_) => "FORBIDDEN",
            CoreError::NotFound { .. } => "NOT_FOUND",
            CoreError::InvalidArgument(_) => "INVALID_ARGUMENT",
            CoreError::LimitExceeded(_) => "LIMIT_EXCEEDED",
            CoreError::CorruptState(_) => "CORRUPT_STATE",
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            CoreError::Unauthenticated(_)
            | CoreError::NotFound { .. }
            | CoreError::CorruptState(_) => Severity::High,
            CoreError::Forbidden(_)
            | CoreError::InvalidArgument(_)
            | CoreError::LimitExceeded(_) => Severity::Medium,
        }
    }

    /// Human-readable message without the variant prefix.
    pub fn message(&self) -> String {
        match self {
            CoreError::Unauthenticated(msg)
            | CoreError::Forbidden(msg)
            | CoreError::InvalidArgument(msg)
            | CoreError::LimitExceeded(msg)
            | CoreError::CorruptState(msg) => msg.clone(),
            CoreError::NotFound { entity, id } => format!("{entity} with id {id} not found"),
        }
    }
}
