use axum::{Json, extract::State, response::IntoResponse};

use crate::response::{ApiError, ApiResponse};
use crate::state::AppState;
use db::models::class_category::Model as ClassCategory;

/// GET /api/class-categories
///
/// Lists all categories, oldest first.
pub async fn list_categories(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let categories = ClassCategory::find_all(app_state.db())
        .await
        .map_err(|e| ApiError::internal("Failed to fetch categories.", e))?;

    Ok(Json(ApiResponse::success(categories, "Categories fetched")))
}
