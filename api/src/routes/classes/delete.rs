use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};
use sea_orm::{ColumnTrait, EntityTrait, ModelTrait, QueryFilter};

use crate::auth::AuthUser;
use crate::auth::guards::require_current_admin;
use crate::response::{ApiError, ApiResponse};
use crate::state::AppState;
use db::models::class::Model as Class;
use db::models::class_enrollment;

/// DELETE /api/classes/{class_id}
///
/// Removes a class and its roster. Enrollments go first so the class row
/// never dangles mid-delete.
pub async fn delete_class(
    State(app_state): State<AppState>,
    AuthUser(claims): AuthUser,
    Path(class_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let db = app_state.db();
    require_current_admin(db, claims.sub, "Only admins can delete classes.").await?;

    let existing = Class::find_by_id(db, class_id)
        .await
        .map_err(|e| ApiError::internal("Failed to delete class.", e))?
        .ok_or_else(|| ApiError::NotFound("Class not found.".into()))?;

    class_enrollment::Entity::delete_many()
        .filter(class_enrollment::Column::ClassId.eq(class_id))
        .exec(db)
        .await
        .map_err(|e| ApiError::internal("Failed to delete class.", e))?;

    existing
        .delete(db)
        .await
        .map_err(|e| ApiError::internal("Failed to delete class.", e))?;

    Ok(Json(ApiResponse::success((), "Class deleted successfully.")))
}
