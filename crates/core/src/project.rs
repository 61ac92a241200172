//! Project-level constants and input validation.

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Page size used when a listing request omits `limit` or passes `0`.
pub const DEFAULT_PROJECT_LIMIT: i64 = 20;

/// Smallest page size a listing request can ask for.
pub const MIN_PROJECT_LIMIT: i64 = 1;

/// Largest page size a listing request can ask for.
pub const MAX_PROJECT_LIMIT: i64 = 100;

/// Longest accepted project name, in characters.
pub const MAX_PROJECT_NAME_LEN: usize = 200;

// ---------------------------------------------------------------------------
// Listing
// ---------------------------------------------------------------------------

/// Clamp a requested page size into `[MIN_PROJECT_LIMIT, MAX_PROJECT_LIMIT]`.
///
/// A missing or zero limit falls back to [`DEFAULT_PROJECT_LIMIT`].
pub fn clamp_project_limit(limit: Option<i64>) -> i64 {
    match limit {
        None | Some(0) => DEFAULT_PROJECT_LIMIT,
        Some(n) => n.clamp(MIN_PROJECT_LIMIT, MAX_PROJECT_LIMIT),
    }
}

// ---------------------------------------------------------------------------
// Names
// ---------------------------------------------------------------------------

/// Name given to a project created without one.
pub fn default_project_name(project_number: i64) -> String {
    format!("Project {project_number}")
}

/// Trim a user-supplied name; blank names become `None`.
pub fn normalize_project_name(name: Option<&str>) -> Result<Option<String>, CoreError> {
    let Some(trimmed) = name.map(str::trim).filter(|n| !n.is_empty()) else {
        return Ok(None);
    };
    if trimmed.chars().count() > MAX_PROJECT_NAME_LEN {
        return Err(CoreError::InvalidArgument(format!(
            "Project name must be at most {MAX_PROJECT_NAME_LEN} characters"
        )));
    }
    Ok(Some(trimmed.to_string()))
}

/// Resolve the final name for a freshly numbered project.
pub fn resolve_project_name(name: Option<String>, project_number: i64) -> String {
    name.unwrap_or_else(|| default_project_name(project_number))
}

// ---------------------------------------------------------------------------
// Payloads
// ---------------------------------------------------------------------------

/// Sketch data is opaque but must be present.
pub fn require_sketch_data(
    sketch_data: Option<serde_json::Value>,
) -> Result<serde_json::Value, CoreError> {
    match sketch_data {
        Some(value) if !value.is_null() => Ok(value),
        _ => Err(CoreError::InvalidArgument("sketch_data is required".into())),
    }
}

/// Parse a stored style guide. Unparsable text means the row is corrupt.
pub fn parse_style_guide(stored: Option<&str>) -> Result<Option<serde_json::Value>, CoreError> {
    match stored {
        None => Ok(None),
        Some(raw) if raw.is_empty() => Ok(None),
        Some(raw) => serde_json::from_str(raw)
            .map(Some)
            .map_err(|_| CoreError::CorruptState("Invalid style guide format".into())),
    }
}

/// Serialize a style guide for storage. `null` clears it.
pub fn serialize_style_guide(style_guide: &serde_json::Value) -> Option<String> {
    if style_guide.is_null() {
        None
    } else {
        Some(style_guide.to_string())
    }
}
