//! HMAC-signed, expiring URLs for blob upload and retrieval.
//!
//! A signature covers the purpose, the storage id, and the expiry timestamp,
//! so an upload URL cannot be replayed as a download URL or re-targeted at a
//! different object.

use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::error::CoreError;

/// Upload targets are valid for one hour by default.
pub const DEFAULT_UPLOAD_TTL_SECS: i64 = 3600;

/// Retrieval URLs are valid for one hour by default.
pub const DEFAULT_DOWNLOAD_TTL_SECS: i64 = 3600;

type HmacSha256 = Hmac<Sha256>;

/// What a signed URL allows its bearer to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UrlPurpose {
    Upload,
    Download,
}

impl UrlPurpose {
    fn as_str(self) -> &'static str {
        match self {
            UrlPurpose::Upload => "upload",
            UrlPurpose::Download => "download",
        }
    }
}

/// Signs and verifies storage URLs with a shared secret.
#[derive(Clone)]
pub struct UrlSigner {
    secret: Vec<u8>,
}

impl std::fmt::Debug for UrlSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UrlSigner").finish_non_exhaustive()
    }
}

impl UrlSigner {
    pub fn new(secret: impl AsRef<[u8]>) -> Self {
        Self {
            secret: secret.as_ref().to_vec(),
        }
    }

    fn mac(&self, purpose: UrlPurpose, storage_id: &str, expires: i64) -> HmacSha256 {
        let mut mac =
            HmacSha256::new_from_slice(&self.secret).expect("HMAC accepts any key length");
        mac.update(purpose.as_str().as_bytes());
        mac.update(b"\n");
        mac.update(storage_id.as_bytes());
        mac.update(b"\n");
        mac.update(expires.to_string().as_bytes());
        mac
    }

    /// Hex-encoded signature for `(purpose, storage_id, expires)`.
    pub fn sign(&self, purpose: UrlPurpose, storage_id: &str, expires: i64) -> String {
        hex::encode(self.mac(purpose, storage_id, expires).finalize().into_bytes())
    }

    /// Check a signature and its expiry against `now` (Unix seconds).
    pub fn verify(
        &self,
        purpose: UrlPurpose,
        storage_id: &str,
        expires: i64,
        signature: &str,
        now: i64,
    ) -> Result<(), CoreError> {
        if expires < now {
            return Err(CoreError::Forbidden("Signed URL has expired".into()));
        }
        let bytes = hex::decode(signature)
            .ok_or_else(|| CoreError::Forbidden("Malformed URL signature".into()))?;
        self.mac(purpose, storage_id, expires)
            .verify_slice(&bytes)
            .map_err(|_| CoreError::Forbidden("Invalid URL signature".into()))
    }
}

mod hex {
    /// Encode bytes as a lowercase hex string.
    pub fn encode(bytes: impl AsRef<[u8]>) -> String {
        bytes.as_ref().iter().map(|b| format!("{b:02x}")).collect()
    }

    /// Decode a hex string; `None` on odd length or non-hex characters.
    pub fn decode(s: &str) -> Option<Vec<u8>> {
        if s.len() % 2 != 0 || !s.is_ascii() {
            return None;
        }
        (0..s.len())
            .step_by(2)
            .map(|i| u8::from_str_radix(&s[i..i + 2], 16).ok())
            .collect()
    }
}
