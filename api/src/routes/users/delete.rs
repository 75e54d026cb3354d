use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};

use crate::response::{ApiError, ApiResponse};
use crate::state::AppState;
use db::models::class_enrollment::Model as ClassEnrollment;
use db::models::user::Model as User;

/// DELETE /api/users/{user_id}/classes/{class_id}
///
/// Removes one booking for a user.
///
/// ### Responses
/// - `200 OK` ("Enrollment removed successfully.")
/// - `404 Not Found` ("User not found." / "Enrollment not found.")
pub async fn delete_user_class_enrollment(
    State(app_state): State<AppState>,
    Path((user_id, class_id)): Path<(i64, i64)>,
) -> Result<impl IntoResponse, ApiError> {
    let db = app_state.db();

    User::find_by_id(db, user_id)
        .await
        .map_err(|e| ApiError::internal("Failed to delete class enrollment.", e))?
        .ok_or_else(|| ApiError::NotFound("User not found.".into()))?;

    let removed = ClassEnrollment::remove(db, class_id, user_id)
        .await
        .map_err(|e| ApiError::internal("Failed to delete class enrollment.", e))?;
    if !removed {
        return Err(ApiError::NotFound("Enrollment not found.".into()));
    }

    Ok(Json(ApiResponse::success(
        (),
        "Enrollment removed successfully.",
    )))
}
