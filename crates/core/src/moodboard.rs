//! Mood-board reference handling: the size cap, attach/detach on the stored
//! list, and concurrent resolution of references into display-ready images.

use async_trait::async_trait;
use futures::future::join_all;
use serde::Serialize;

use crate::error::CoreError;

/// Maximum number of images a project's mood board may hold or resolve.
pub const MAX_MOODBOARD_IMAGES: usize = 20;

/// Prefix for client-facing image ids, shared with the drag-and-drop uploader.
pub const IMAGE_ID_PREFIX: &str = "drop-creative-";

/// A failure while turning one reference into a URL.
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct ResolveError(pub String);

/// Turns an opaque storage reference into a retrieval URL.
///
/// `Ok(None)` means the reference is no longer backed by stored data.
#[async_trait]
pub trait ReferenceResolver: Send + Sync {
    async fn resolve(&self, reference: &str) -> Result<Option<String>, ResolveError>;
}

/// One resolved mood-board entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedImage {
    pub id: String,
    pub storage_id: String,
    pub url: String,
    pub uploaded: bool,
    pub uploading: bool,
    /// Position in the stored list, kept even when earlier entries were dropped.
    pub index: usize,
}

fn limit_exceeded(max_count: usize) -> CoreError {
    CoreError::LimitExceeded(format!(
        "Too many moodboard images. Maximum {max_count} images allowed."
    ))
}

/// Resolve every reference concurrently, dropping the ones that fail.
///
/// A list longer than `max_count` is rejected outright rather than truncated.
/// The output is sorted by original position regardless of completion order.
pub async fn list_resolved<R>(
    references: &[String],
    max_count: usize,
    resolver: &R,
) -> Result<Vec<ResolvedImage>, CoreError>
where
    R: ReferenceResolver + ?Sized,
{
    if references.len() > max_count {
        return Err(limit_exceeded(max_count));
    }

    let lookups = references
        .iter()
        .enumerate()
        .map(|(index, reference)| async move {
            match resolver.resolve(reference).await {
                Ok(Some(url)) => Some(ResolvedImage {
                    id: format!("{IMAGE_ID_PREFIX}{reference}"),
                    storage_id: reference.clone(),
                    url,
                    uploaded: true,
                    uploading: false,
                    index,
                }),
                Ok(None) => {
                    tracing::debug!(storage_id = %reference, index, "Moodboard reference has no stored data");
                    None
                }
                Err(e) => {
                    tracing::warn!(storage_id = %reference, index, error = %e, "Moodboard reference failed to resolve");
                    None
                }
            }
        });

    let mut images: Vec<ResolvedImage> = join_all(lookups).await.into_iter().flatten().collect();
    images.sort_by_key(|image| image.index);
    Ok(images)
}

/// Append `reference` to the stored list.
///
/// Returns `false` when it was already present (the list is left unchanged).
pub fn attach_reference(
    references: &mut Vec<String>,
    reference: &str,
    max_count: usize,
) -> Result<bool, CoreError> {
    if reference.trim().is_empty() {
        return Err(CoreError::InvalidArgument("storage_id is required".into()));
    }
    if references.iter().any(|r| r == reference) {
        return Ok(false);
    }
    if references.len() >= max_count {
        return Err(limit_exceeded(max_count));
    }
    references.push(reference.to_string());
    Ok(true)
}

/// Remove `reference` from the stored list, preserving the order of the rest.
pub fn detach_reference(references: &mut Vec<String>, reference: &str) -> Result<(), CoreError> {
    let position = references
        .iter()
        .position(|r| r == reference)
        .ok_or_else(|| CoreError::NotFound {
            entity: "Moodboard image",
            id: reference.to_string(),
        })?;
    references.remove(position);
    Ok(())
}
