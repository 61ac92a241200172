//! Ownership and visibility checks shared by every project read/write path.
//!
//! Handlers resolve the target resource first and only then call into this
//! module, so a missing resource always surfaces as `NotFound` before any
//! `Forbidden` decision is made, whether or not the caller is signed in.

use crate::error::CoreError;

/// Return the caller's identity or fail with `Unauthenticated` when there is none.
pub fn require_authenticated<T>(caller: Option<T>) -> Result<T, CoreError> {
    caller.ok_or_else(|| {
        CoreError::Unauthenticated("Unauthenticated. Please sign in to continue.".into())
    })
}

/// Readable when the caller owns the resource or the resource is public.
///
/// An anonymous caller on a private resource gets `Forbidden`, never `NotFound`.
pub fn authorize_read(
    owner_id: &str,
    is_public: bool,
    caller_id: Option<&str>,
) -> Result<(), CoreError> {
    if is_public || caller_id == Some(owner_id) {
        return Ok(());
    }
    Err(CoreError::Forbidden(
        "Access denied. You are not the owner of this project and it is not public.".into(),
    ))
}

/// Only the owner may write; public visibility grants nothing here.
pub fn authorize_write(owner_id: &str, caller_id: &str) -> Result<(), CoreError> {
    if owner_id == caller_id {
        Ok(())
    } else {
        Err(CoreError::Forbidden(
            "Access denied. Only the owner may modify this project.".into(),
        ))
    }
}

/// Callers may only act "for" themselves when they name an owner explicitly.
pub fn authorize_self(requested_owner_id: &str, caller_id: &str) -> Result<(), CoreError> {
    if requested_owner_id == caller_id {
        Ok(())
    } else {
        Err(CoreError::Forbidden(
            "Cannot access or create projects for another user".into(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn require_authenticated_rejects_missing_caller() {
        assert_matches!(
            require_authenticated::<&str>(None),
            Err(CoreError::Unauthenticated(_))
        );
        assert_eq!(require_authenticated(Some("u1")).unwrap(), "u1");
    }

    #[test]
    fn owner_can_read_private() {
        assert!(authorize_read("u1", false, Some("u1")).is_ok());
    }

    #[test]
    fn non_owner_denied_on_private() {
        assert_matches!(
            authorize_read("u1", false, Some("u2")),
            Err(CoreError::Forbidden(_))
        );
    }

    #[test]
    fn anonymous_denied_on_private() {
        assert_matches!(
            authorize_read("u1", false, None),
            Err(CoreError::Forbidden(_))
        );
    }

    #[test]
    fn anyone_can_read_public() {
        assert!(authorize_read("u1", true, Some("u2")).is_ok());
        assert!(authorize_read("u1", true, None).is_ok());
    }

    #[test]
    fn write_requires_owner_even_when_public() {
        assert!(authorize_write("u1", "u1").is_ok());
        assert_matches!(authorize_write("u1", "u2"), Err(CoreError::Forbidden(_)));
    }

    #[test]
    fn self_check_compares_ids() {
        assert!(authorize_self("u1", "u1").is_ok());
        assert_matches!(authorize_self("u2", "u1"), Err(CoreError::Forbidden(_)));
    }
}
