//! Session token handling.
//!
//! - [`jwt`] -- HS256 verification of identity-provider tokens.

pub mod jwt;
