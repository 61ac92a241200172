//! JWT-based authentication extractors for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use draftboard_core::authz::require_authenticated;
use draftboard_core::error::CoreError;

use crate::auth::jwt::validate_token;
use crate::error::AppError;
use crate::state::AppState;

/// Authenticated user extracted from a JWT Bearer token in the `Authorization` header.
///
/// Use this as an extractor parameter in any handler that requires authentication:
///
/// ```ignore
/// async fn my_handler(user: AuthUser) -> AppResult<Json<()>> {
///     tracing::info!(user_id = %user.user_id, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// The identity provider's user id (from `claims.sub`).
    pub user_id: String,
    pub email: Option<String>,
}

/// Resolve the bearer token, if any.
///
/// `Ok(None)` when no `Authorization` header was sent at all; a header that is
/// present but unusable is an error.
fn authenticate(parts: &Parts, state: &AppState) -> Result<Option<AuthUser>, CoreError> {
    let Some(auth_header) = parts.headers.get("authorization") else {
        return Ok(None);
    };
    let auth_header = auth_header
        .to_str()
        .map_err(|_| CoreError::Unauthenticated("Malformed Authorization header".into()))?;

    let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
        CoreError::Unauthenticated("Invalid Authorization format. Expected: Bearer <token>".into())
    })?;

    let claims = validate_token(token, &state.config.jwt)
        .map_err(|_| CoreError::Unauthenticated("Invalid or expired token".into()))?;

    if claims.sub.trim().is_empty() {
        return Err(CoreError::Unauthenticated("Token has no subject".into()));
    }

    Ok(Some(AuthUser {
        user_id: claims.sub,
        email: claims.email,
    }))
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(require_authenticated(authenticate(parts, state)?)?)
    }
}

/// The caller, if one can be identified.
///
/// Read paths use this so that a missing or unusable token leaves the caller
/// anonymous instead of failing early; existence is then checked before
/// visibility, and public projects stay readable.
#[derive(Debug, Clone)]
pub struct MaybeAuthUser(pub Option<AuthUser>);

impl MaybeAuthUser {
    pub fn user_id(&self) -> Option<&str> {
        self.0.as_ref().map(|user| user.user_id.as_str())
    }
}

impl FromRequestParts<AppState> for MaybeAuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match authenticate(parts, state) {
            Ok(user) => Ok(MaybeAuthUser(user)),
            Err(e) => {
                tracing::debug!(error = %e, "Ignoring unusable credentials on optional-auth route");
                Ok(MaybeAuthUser(None))
            }
        }
    }
}
