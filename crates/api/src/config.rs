use std::path::PathBuf;

use draftboard_core::signing::{DEFAULT_DOWNLOAD_TTL_SECS, DEFAULT_UPLOAD_TTL_SECS};

use crate::auth::jwt::JwtConfig;

/// Default upper bound for a single uploaded image (10 MiB).
const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Server configuration loaded from environment variables.
///
/// All fields except secrets have defaults suitable for local development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// PostgreSQL URL. When unset the server runs on the in-memory store.
    pub database_url: Option<String>,
    /// Bearer-token verification settings.
    pub jwt: JwtConfig,
    /// Blob storage and signed-URL settings.
    pub storage: StorageConfig,
}

/// Where uploaded images live and how their URLs are signed.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Directory holding one file per stored object.
    pub root: PathBuf,
    /// HMAC secret for upload and retrieval URLs.
    pub signing_secret: String,
    /// Externally visible origin used to build absolute URLs.
    pub public_base_url: String,
    pub upload_url_ttl_secs: i64,
    pub download_url_ttl_secs: i64,
    pub max_upload_bytes: usize,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:3001`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    /// | `DATABASE_URL`         | unset (in-memory store)    |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:3001".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let database_url = std::env::var("DATABASE_URL")
            .ok()
            .filter(|url| !url.trim().is_empty());

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            database_url,
            jwt: JwtConfig::from_env(),
            storage: StorageConfig::from_env(),
        }
    }
}

impl StorageConfig {
    /// Load storage settings from environment variables.
    ///
    /// | Env Var                  | Required | Default                 |
    /// |--------------------------|----------|-------------------------|
    /// | `STORAGE_SIGNING_SECRET` | **yes**  | --                      |
    /// | `STORAGE_ROOT`           | no       | `./data/blobs`          |
    /// | `PUBLIC_BASE_URL`        | no       | `http://localhost:3000` |
    /// | `UPLOAD_URL_TTL_SECS`    | no       | `3600`                  |
    /// | `DOWNLOAD_URL_TTL_SECS`  | no       | `3600`                  |
    /// | `MAX_UPLOAD_BYTES`       | no       | `10485760`              |
    ///
    /// # Panics
    ///
    /// Panics if `STORAGE_SIGNING_SECRET` is not set or is empty.
    pub fn from_env() -> Self {
        let signing_secret = std::env::var("STORAGE_SIGNING_SECRET")
            .expect("STORAGE_SIGNING_SECRET must be set in the environment");
        assert!(
            !signing_secret.is_empty(),
            "STORAGE_SIGNING_SECRET must not be empty"
        );

        let root = std::env::var("STORAGE_ROOT")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./data/blobs"));

        let public_base_url = std::env::var("PUBLIC_BASE_URL")
            .unwrap_or_else(|_| "http://localhost:3000".into())
            .trim_end_matches('/')
            .to_string();

        let upload_url_ttl_secs: i64 = std::env::var("UPLOAD_URL_TTL_SECS")
            .unwrap_or_else(|_| DEFAULT_UPLOAD_TTL_SECS.to_string())
            .parse()
            .expect("UPLOAD_URL_TTL_SECS must be a valid i64");

        let download_url_ttl_secs: i64 = std::env::var("DOWNLOAD_URL_TTL_SECS")
            .unwrap_or_else(|_| DEFAULT_DOWNLOAD_TTL_SECS.to_string())
            .parse()
            .expect("DOWNLOAD_URL_TTL_SECS must be a valid i64");

        let max_upload_bytes: usize = std::env::var("MAX_UPLOAD_BYTES")
            .unwrap_or_else(|_| DEFAULT_MAX_UPLOAD_BYTES.to_string())
            .parse()
            .expect("MAX_UPLOAD_BYTES must be a valid usize");

        Self {
            root,
            signing_secret,
            public_base_url,
            upload_url_ttl_secs,
            download_url_ttl_secs,
            max_upload_bytes,
        }
    }
}
