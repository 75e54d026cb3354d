use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, IntoActiveModel, Set};
use serde::{Deserialize, Deserializer};

use crate::auth::AuthUser;
use crate::auth::guards::require_current_admin;
use crate::response::{ApiError, ApiResponse};
use crate::routes::classes::common::build_class_response;
use crate::routes::classes::post::{parse_required_role, parse_time};
use crate::state::AppState;
use db::models::class::Model as Class;
use db::models::class_category::Model as ClassCategory;
use db::models::user::{Model as User, Role};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateClassRequest {
    pub trainer_id: Option<i64>,
    // Double Option: absent = unchanged, explicit null = clear.
    #[serde(default, deserialize_with = "present_field")]
    pub category_id: Option<Option<i64>>,
    pub required_role: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    #[serde(default, deserialize_with = "present_field")]
    pub capacity: Option<Option<i32>>,
}

/// Distinguishes an absent field from an explicit `null`.
fn present_field<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}

/// PUT /api/classes/{class_id}
///
/// Partial update; only provided fields change. Time fields are
/// re-validated as a pair against the stored values.
pub async fn update_class(
    State(app_state): State<AppState>,
    AuthUser(claims): AuthUser,
    Path(class_id): Path<i64>,
    Json(req): Json<UpdateClassRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let db = app_state.db();
    require_current_admin(db, claims.sub, "Only admins can update classes.").await?;

    let existing = Class::find_by_id(db, class_id)
        .await
        .map_err(|e| ApiError::internal("Failed to update class.", e))?
        .ok_or_else(|| ApiError::NotFound("Class not found.".into()))?;

    let required_role = req
        .required_role
        .as_deref()
        .map(parse_required_role)
        .transpose()?;

    let stored_start = existing.start_time;
    let stored_end = existing.end_time;
    let mut active = existing.into_active_model();

    if let Some(title) = req.title {
        active.title = Set(title);
    }
    if let Some(description) = req.description {
        active.description = Set(Some(description));
    }
    if let Some(capacity) = req.capacity {
        match capacity {
            Some(capacity) if capacity <= 0 => {
                return Err(ApiError::Validation(
                    "capacity must be greater than zero if provided.".into(),
                ));
            }
            capacity => active.capacity = Set(capacity),
        }
    }
    if let Some(role) = required_role {
        active.required_role = Set(Some(role));
    }

    if req.start_time.is_some() || req.end_time.is_some() {
        let start = match req.start_time.as_deref() {
            Some(raw) => parse_time(raw)?,
            None => stored_start,
        };
        let end = match req.end_time.as_deref() {
            Some(raw) => parse_time(raw)?,
            None => stored_end,
        };
        if end <= start {
            return Err(ApiError::Validation("endTime must be after startTime.".into()));
        }
        active.start_time = Set(start);
        active.end_time = Set(end);
    }

    if let Some(trainer_id) = req.trainer_id {
        let trainer = User::find_by_id(db, trainer_id)
            .await
            .map_err(|e| ApiError::internal("Failed to update class.", e))?
            .filter(|u| u.role == Role::Trainer);
        if trainer.is_none() {
            return Err(ApiError::Validation(
                "trainerId must reference a trainer user.".into(),
            ));
        }
        active.trainer_id = Set(trainer_id);
    }

    if let Some(category_id) = req.category_id {
        match category_id {
            Some(category_id) => {
                let category = ClassCategory::find_by_id(db, category_id)
                    .await
                    .map_err(|e| ApiError::internal("Failed to update class.", e))?;
                if category.is_none() {
                    return Err(ApiError::Validation(
                        "categoryId must reference an existing category.".into(),
                    ));
                }
                active.category_id = Set(Some(category_id));
            }
            None => active.category_id = Set(None),
        }
    }

    active.updated_at = Set(Utc::now());

    let updated = active
        .update(db)
        .await
        .map_err(|e| ApiError::internal("Failed to update class.", e))?;

    let response = build_class_response(db, updated)
        .await
        .map_err(|e| ApiError::internal("Failed to update class.", e))?;

    Ok(Json(ApiResponse::success(response, "Class updated successfully")))
}
