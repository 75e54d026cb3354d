use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};
use serde::Deserialize;
use std::str::FromStr;

use crate::auth::AuthUser;
use crate::auth::guards::require_current_admin;
use crate::response::{ApiError, ApiResponse};
use crate::routes::users::get::UserProfileResponse;
use crate::state::AppState;
use db::models::user::{Model as User, Role};

#[derive(Debug, Deserialize)]
pub struct UpdateRoleRequest {
    pub role: Option<String>,
}

/// PATCH /api/users/{user_id}/role
///
/// Admin-only role change. On top of the route gate, the acting user's
/// admin role is re-read from the database so a downgraded admin cannot
/// keep promoting users on a stale token.
///
/// ### Responses
/// - `200 OK` with the updated user
/// - `400 Bad Request` ("Invalid role." / self-promotion guard)
/// - `403 Forbidden` ("Only admins can update user roles.")
/// - `404 Not Found` ("User not found.")
pub async fn update_user_role(
    State(app_state): State<AppState>,
    AuthUser(claims): AuthUser,
    Path(user_id): Path<i64>,
    Json(req): Json<UpdateRoleRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let raw_role = req
        .role
        .as_deref()
        .ok_or_else(|| ApiError::Validation("userId and role are required.".into()))?;
    let role =
        Role::from_str(raw_role).map_err(|_| ApiError::Validation("Invalid role.".into()))?;

    let db = app_state.db();
    let admin = require_current_admin(db, claims.sub, "Only admins can update user roles.").await?;

    if role == Role::Admin && admin.id == user_id {
        return Err(ApiError::Validation(
            "Cannot change own role to ADMIN again.".into(),
        ));
    }

    let target = User::find_by_id(db, user_id)
        .await
        .map_err(|e| ApiError::internal("Failed to update user role.", e))?
        .ok_or_else(|| ApiError::NotFound("User not found.".into()))?;

    let updated = target
        .update_role(db, role)
        .await
        .map_err(|e| ApiError::internal("Failed to update user role.", e))?;

    Ok(Json(ApiResponse::success(
        UserProfileResponse::from(&updated),
        "User role updated successfully",
    )))
}
