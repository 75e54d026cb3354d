use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::Deserialize;

use crate::auth::AuthUser;
use crate::auth::guards::require_current_admin;
use crate::response::{ApiError, ApiResponse};
use crate::state::AppState;
use db::models::class_category::Model as ClassCategory;

#[derive(Debug, Deserialize)]
pub struct CreateCategoryRequest {
    pub name: Option<String>,
    pub description: Option<String>,
}

/// POST /api/class-categories
///
/// Create a new class category. Only accessible by admin users; the admin
/// role is asserted against the current database row, not just the token.
///
/// ### Request Body
/// ```json
/// {
///   "name": "Yoga",
///   "description": "Low-impact classes"
/// }
/// ```
///
/// ### Responses
/// - `201 Created` with the new category
/// - `400 Bad Request` ("name is required.")
/// - `401` / `403` from the admin gate
/// - `409 Conflict` ("Category name already exists.")
pub async fn create_category(
    State(app_state): State<AppState>,
    AuthUser(claims): AuthUser,
    Json(req): Json<CreateCategoryRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let name = match req.name.as_deref().map(str::trim) {
        Some(name) if !name.is_empty() => name.to_owned(),
        _ => return Err(ApiError::Validation("name is required.".into())),
    };

    let db = app_state.db();
    require_current_admin(db, claims.sub, "Only admins can perform this action.").await?;

    match ClassCategory::create(db, &name, req.description.as_deref()).await {
        Ok(category) => Ok((
            StatusCode::CREATED,
            Json(ApiResponse::success(category, "Category created successfully")),
        )),
        Err(e) if db::is_unique_violation(&e) => {
            Err(ApiError::Conflict("Category name already exists.".into()))
        }
        Err(e) => Err(ApiError::internal("Failed to create category.", e)),
    }
}
