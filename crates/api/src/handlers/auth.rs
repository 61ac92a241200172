//! Handlers for the `/auth` resource.

use axum::Json;
use serde::Serialize;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;

/// Identity of the session holder.
#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub user_id: String,
    pub email: Option<String>,
}

/// GET /api/v1/auth/me
pub async fn me(user: AuthUser) -> AppResult<Json<MeResponse>> {
    Ok(Json(MeResponse {
        user_id: user.user_id,
        email: user.email,
    }))
}
