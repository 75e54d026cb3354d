use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};
use sea_orm::ModelTrait;

use crate::auth::AuthUser;
use crate::auth::guards::require_current_admin;
use crate::response::{ApiError, ApiResponse};
use crate::state::AppState;
use db::models::class_category::Model as ClassCategory;

/// DELETE /api/class-categories/{category_id}
///
/// Deletion is refused while any class still references the category.
///
/// ### Responses
/// - `200 OK` ("Category deleted successfully.")
/// - `400 Bad Request` (category still in use)
/// - `404 Not Found` ("Category not found.")
pub async fn delete_category(
    State(app_state): State<AppState>,
    AuthUser(claims): AuthUser,
    Path(category_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let db = app_state.db();
    require_current_admin(db, claims.sub, "Only admins can perform this action.").await?;

    let existing = ClassCategory::find_by_id(db, category_id)
        .await
        .map_err(|e| ApiError::internal("Failed to delete category.", e))?
        .ok_or_else(|| ApiError::NotFound("Category not found.".into()))?;

    let in_use = existing
        .class_count(db)
        .await
        .map_err(|e| ApiError::internal("Failed to delete category.", e))?;
    if in_use > 0 {
        return Err(ApiError::Validation(format!(
            "Cannot delete category. It is used by {} class(es).",
            in_use
        )));
    }

    existing
        .delete(db)
        .await
        .map_err(|e| ApiError::internal("Failed to delete category.", e))?;

    Ok(Json(ApiResponse::success(
        (),
        "Category deleted successfully.",
    )))
}
