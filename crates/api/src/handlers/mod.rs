//! Request handlers.
//!
//! Each submodule provides the async handler functions for one resource.
//! Handlers delegate persistence to the [`ProjectStore`] in the application
//! state and map errors via [`AppError`].
//!
//! [`ProjectStore`]: draftboard_db::store::ProjectStore
//! [`AppError`]: crate::error::AppError

pub mod auth;
pub mod moodboard;
pub mod project;
pub mod storage;
