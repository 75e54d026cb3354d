use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, IntoActiveModel, Set};
use serde::Deserialize;

use crate::auth::AuthUser;
use crate::auth::guards::require_current_admin;
use crate::response::{ApiError, ApiResponse};
use crate::state::AppState;
use db::models::class_category::Model as ClassCategory;

#[derive(Debug, Deserialize)]
pub struct UpdateCategoryRequest {
    pub name: Option<String>,
    pub description: Option<String>,
}

/// PUT /api/class-categories/{category_id}
///
/// Partial update: only the provided fields change. A body with no
/// recognized fields is rejected.
///
/// ### Responses
/// - `200 OK` with the updated category
/// - `400 Bad Request` ("No fields to update.")
/// - `404 Not Found` ("Category not found.")
/// - `409 Conflict` ("Category name already exists.")
pub async fn update_category(
    State(app_state): State<AppState>,
    AuthUser(claims): AuthUser,
    Path(category_id): Path<i64>,
    Json(req): Json<UpdateCategoryRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let db = app_state.db();
    require_current_admin(db, claims.sub, "Only admins can perform this action.").await?;

    let existing = ClassCategory::find_by_id(db, category_id)
        .await
        .map_err(|e| ApiError::internal("Failed to update category.", e))?
        .ok_or_else(|| ApiError::NotFound("Category not found.".into()))?;

    if req.name.is_none() && req.description.is_none() {
        return Err(ApiError::Validation("No fields to update.".into()));
    }

    let mut active = existing.into_active_model();
    if let Some(name) = req.name {
        active.name = Set(name);
    }
    if let Some(description) = req.description {
        active.description = Set(Some(description));
    }
    active.updated_at = Set(Utc::now());

    match active.update(db).await {
        Ok(updated) => Ok(Json(ApiResponse::success(
            updated,
            "Category updated successfully",
        ))),
        Err(e) if db::is_unique_violation(&e) => {
            Err(ApiError::Conflict("Category name already exists.".into()))
        }
        Err(e) => Err(ApiError::internal("Failed to update category.", e)),
    }
}
