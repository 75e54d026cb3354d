use axum::{Json, extract::State, response::IntoResponse};
use serde::Deserialize;

use crate::auth::AuthUser;
use crate::response::{ApiError, ApiResponse};
use crate::state::AppState;
use db::models::user::Model as User;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub current_password: Option<String>,
    pub new_password: Option<String>,
}

/// POST /api/users/change-password
///
/// Requires the current password before accepting a new one.
///
/// ### Responses
/// - `200 OK` ("Password changed successfully")
/// - `400 Bad Request` (missing fields / too short)
/// - `401 Unauthorized` ("Current password is incorrect")
/// - `404 Not Found` (token subject no longer exists)
pub async fn change_password(
    State(app_state): State<AppState>,
    AuthUser(claims): AuthUser,
    Json(req): Json<ChangePasswordRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let (Some(current_password), Some(new_password)) =
        (req.current_password.as_deref(), req.new_password.as_deref())
    else {
        return Err(ApiError::Validation(
            "Current password and new password are required.".into(),
        ));
    };

    if new_password.len() < 6 {
        return Err(ApiError::Validation(
            "New password must be at least 6 characters.".into(),
        ));
    }

    let db = app_state.db();
    let user = User::find_by_id(db, claims.sub)
        .await
        .map_err(|e| ApiError::internal("Failed to change password.", e))?
        .ok_or_else(|| ApiError::NotFound("User not found.".into()))?;

    if !user.verify_password(current_password) {
        return Err(ApiError::Authentication(
            "Current password is incorrect.".into(),
        ));
    }

    user.set_password(db, new_password)
        .await
        .map_err(|e| ApiError::internal("Failed to change password.", e))?;

    Ok(Json(ApiResponse::success(
        (),
        "Password changed successfully.",
    )))
}
