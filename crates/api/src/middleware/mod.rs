//! Authentication extractors.
//!
//! - [`auth::AuthUser`] -- Requires a valid Bearer token (401 otherwise).
//! - [`auth::MaybeAuthUser`] -- Resolves the caller if a valid token is present.

pub mod auth;
