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
use db::models::trainer_review::Model as TrainerReview;

/// DELETE /api/reviews/{review_id}
///
/// Admin-only moderation hook.
pub async fn delete_review(
    State(app_state): State<AppState>,
    AuthUser(claims): AuthUser,
    Path(review_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let db = app_state.db();
    require_current_admin(db, claims.sub, "Only admins can perform this action.").await?;

    let review = TrainerReview::find_by_id(db, review_id)
        .await
        .map_err(|e| ApiError::internal("Failed to delete review.", e))?
        .ok_or_else(|| ApiError::NotFound("Review not found.".into()))?;

    review
        .delete(db)
        .await
        .map_err(|e| ApiError::internal("Failed to delete review.", e))?;

    Ok(Json(ApiResponse::success((), "Review deleted successfully.")))
}
