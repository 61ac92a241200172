//! Local-disk blob storage for mood-board images, addressed by UUID and
//! reached through HMAC-signed, expiring URLs.

use std::path::PathBuf;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use draftboard_core::error::CoreError;
use draftboard_core::moodboard::{ReferenceResolver, ResolveError};
use draftboard_core::signing::{UrlPurpose, UrlSigner};
use serde::Serialize;
use uuid::Uuid;

use crate::config::StorageConfig;

/// A freshly issued upload target.
#[derive(Debug, Clone, Serialize)]
pub struct UploadTarget {
    pub storage_id: String,
    pub upload_url: String,
    pub expires_at: DateTime<Utc>,
}

/// Blob directory plus the signer that guards access to it.
#[derive(Debug)]
pub struct BlobStorage {
    root: PathBuf,
    signer: UrlSigner,
    public_base_url: String,
    upload_ttl_secs: i64,
    download_ttl_secs: i64,
}

/// Parse a storage id. Only canonical UUIDs are accepted, which also keeps
/// ids from escaping the blob directory.
pub fn parse_storage_id(raw: &str) -> Result<Uuid, CoreError> {
    Uuid::parse_str(raw)
        .map_err(|_| CoreError::InvalidArgument(format!("Invalid storage id '{raw}'")))
}

/// Content type of a supported image, detected from its header bytes.
pub fn detect_image_type(bytes: &[u8]) -> Result<&'static str, CoreError> {
    use image::ImageFormat;

    match image::guess_format(bytes) {
        Ok(
            format @ (ImageFormat::Png | ImageFormat::Jpeg | ImageFormat::WebP | ImageFormat::Gif),
        ) => Ok(format.to_mime_type()),
        _ => Err(CoreError::InvalidArgument(
            "Unsupported image format. Expected PNG, JPEG, WebP or GIF.".into(),
        )),
    }
}

impl BlobStorage {
    pub fn new(config: &StorageConfig) -> Self {
        Self {
            root: config.root.clone(),
            signer: UrlSigner::new(&config.signing_secret),
            public_base_url: config.public_base_url.clone(),
            upload_ttl_secs: config.upload_url_ttl_secs,
            download_ttl_secs: config.download_url_ttl_secs,
        }
    }

    /// Create the blob directory if it does not exist yet.
    pub async fn ensure_root(&self) -> std::io::Result<()> {
        tokio::fs::create_dir_all(&self.root).await
    }

    fn path_for(&self, storage_id: Uuid) -> PathBuf {
        self.root.join(storage_id.to_string())
    }

    /// Reserve a new storage id and sign an upload URL for it.
    pub fn upload_target(&self, now: DateTime<Utc>) -> UploadTarget {
        let storage_id = Uuid::new_v4().to_string();
        let expires = now.timestamp() + self.upload_ttl_secs;
        let sig = self.signer.sign(UrlPurpose::Upload, &storage_id, expires);
        UploadTarget {
            upload_url: format!(
                "{}/api/v1/storage/upload?storage_id={storage_id}&expires={expires}&sig={sig}",
                self.public_base_url
            ),
            expires_at: DateTime::from_timestamp(expires, 0).unwrap_or(now),
            storage_id,
        }
    }

    /// Signed retrieval URL for `storage_id`, valid from `now`.
    pub fn download_url(&self, storage_id: &str, now: DateTime<Utc>) -> String {
        let expires = now.timestamp() + self.download_ttl_secs;
        let sig = self.signer.sign(UrlPurpose::Download, storage_id, expires);
        format!(
            "{}/api/v1/storage/objects/{storage_id}?expires={expires}&sig={sig}",
            self.public_base_url
        )
    }

    /// Check a presented signature against the current time.
    pub fn verify(
        &self,
        purpose: UrlPurpose,
        storage_id: &str,
        expires: i64,
        signature: &str,
    ) -> Result<(), CoreError> {
        self.signer
            .verify(purpose, storage_id, expires, signature, Utc::now().timestamp())
    }

    /// Store an object under a fresh id.
    ///
    /// The bytes go to a private temporary file first and are published
    /// under `storage_id` with a no-clobber hard link, so a reader only ever
    /// sees complete objects. Returns `false` without touching the existing
    /// data when something is already stored under `storage_id`, so an
    /// upload URL only works once.
    pub async fn write(&self, storage_id: Uuid, bytes: &[u8]) -> std::io::Result<bool> {
        self.ensure_root().await?;
        let staging = self
            .root
            .join(format!(".{storage_id}.{}.part", Uuid::new_v4().simple()));

        let published = match write_staged(&staging, bytes).await {
            Ok(()) => match tokio::fs::hard_link(&staging, self.path_for(storage_id)).await {
                Ok(()) => Ok(true),
                Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => Ok(false),
                Err(e) => Err(e),
            },
            Err(e) => Err(e),
        };

        if let Err(e) = tokio::fs::remove_file(&staging).await {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!(path = %staging.display(), error = %e, "Staged upload not removed");
            }
        }
        published
    }

    /// Read an object; `None` when nothing is stored under `storage_id`.
    pub async fn read(&self, storage_id: Uuid) -> std::io::Result<Option<Vec<u8>>> {
        match tokio::fs::read(self.path_for(storage_id)).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    pub async fn exists(&self, storage_id: Uuid) -> std::io::Result<bool> {
        tokio::fs::try_exists(self.path_for(storage_id)).await
    }
}

async fn write_staged(path: &std::path::Path, bytes: &[u8]) -> std::io::Result<()> {
    use tokio::io::AsyncWriteExt;

    let mut file = tokio::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .await?;
    file.write_all(bytes).await?;
    file.sync_all().await?;
    Ok(())
}

#[async_trait]
impl ReferenceResolver for BlobStorage {
    async fn resolve(&self, reference: &str) -> Result<Option<String>, ResolveError> {
        let Ok(storage_id) = parse_storage_id(reference) else {
            return Ok(None);
        };
        let present = self
            .exists(storage_id)
            .await
            .map_err(|e| ResolveError(e.to_string()))?;
        if !present {
            return Ok(None);
        }
        Ok(Some(self.download_url(reference, Utc::now())))
    }
}
