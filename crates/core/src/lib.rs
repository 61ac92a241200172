//! Domain logic for the draftboard backend.
//!
//! This crate has no internal dependencies: it holds the error taxonomy, the
//! authorization gate, the project-number allocation step, the mood-board
//! fetcher, and URL signing, so both the storage layer and the HTTP layer can
//! share them.

pub mod authz;
pub mod error;
pub mod moodboard;
pub mod project;
pub mod sequence;
pub mod signing;
pub mod types;
