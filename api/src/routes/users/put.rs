use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, IntoActiveModel, QueryFilter, Set};
use serde::{Deserialize, Deserializer};

use crate::response::{ApiError, ApiResponse};
use crate::routes::users::get::UserProfileResponse;
use crate::state::AppState;
use db::models::user::{self, Model as User};

const MAX_PROFILE_IMAGE_BYTES: usize = 2 * 1024 * 1024;
const ALLOWED_IMAGE_MIME_TYPES: [&str; 4] = ["image/jpeg", "image/png", "image/webp", "image/gif"];

lazy_static::lazy_static! {
    static ref DATA_URL_REGEX: regex::Regex =
        regex::Regex::new(r"^data:(image/[A-Za-z0-9.+-]+);base64,([A-Za-z0-9+/=\s]+)$").unwrap();
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub username: Option<String>,
    // Absent = unchanged, explicit null = remove the picture.
    #[serde(default, deserialize_with = "present_field")]
    pub profile_image: Option<Option<String>>,
}

fn present_field<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}

/// Validates and canonicalizes an inline profile image: must be a base64
/// `data:image/...` URL of an allowed type, at most 2 MiB decoded.
fn normalize_profile_image(input: &str) -> Result<Option<String>, ApiError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let captures = DATA_URL_REGEX
        .captures(trimmed)
        .ok_or_else(|| ApiError::Validation("Profile image must be a valid base64 data URL.".into()))?;

    let mime_type = captures.get(1).map(|m| m.as_str()).unwrap_or_default();
    if !ALLOWED_IMAGE_MIME_TYPES.contains(&mime_type) {
        return Err(ApiError::Validation("Unsupported profile image type.".into()));
    }

    let base64_data: String = captures
        .get(2)
        .map(|m| m.as_str())
        .unwrap_or_default()
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();

    let decoded = BASE64
        .decode(base64_data.as_bytes())
        .map_err(|_| ApiError::Validation("Profile image must be a valid base64 data URL.".into()))?;
    if decoded.len() > MAX_PROFILE_IMAGE_BYTES {
        return Err(ApiError::Validation(
            "Profile image must be 2MB or smaller.".into(),
        ));
    }

    Ok(Some(format!("data:{};base64,{}", mime_type, base64_data)))
}

/// PUT /api/users/{user_id}
///
/// Updates display name and/or profile picture.
///
/// ### Responses
/// - `200 OK` with the updated profile
/// - `400 Bad Request` ("Username already taken." / invalid image)
/// - `404 Not Found` ("User not found.")
pub async fn update_user_profile(
    State(app_state): State<AppState>,
    Path(user_id): Path<i64>,
    Json(req): Json<UpdateProfileRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let db = app_state.db();

    let existing = User::find_by_id(db, user_id)
        .await
        .map_err(|e| ApiError::internal("Failed to update user profile.", e))?
        .ok_or_else(|| ApiError::NotFound("User not found.".into()))?;

    if let Some(username) = req.username.as_deref().filter(|u| !u.is_empty()) {
        let taken = user::Entity::find()
            .filter(user::Column::Username.eq(username))
            .filter(user::Column::Id.ne(user_id))
            .one(db)
            .await
            .map_err(|e| ApiError::internal("Failed to update user profile.", e))?;
        if taken.is_some() {
            return Err(ApiError::Validation("Username already taken.".into()));
        }
    }

    let mut active = existing.into_active_model();
    if let Some(username) = req.username {
        active.username = Set(if username.is_empty() { None } else { Some(username) });
    }
    if let Some(profile_image) = req.profile_image {
        let normalized = match profile_image.as_deref() {
            Some(raw) => normalize_profile_image(raw)?,
            None => None,
        };
        active.profile_image = Set(normalized);
    }
    active.updated_at = Set(Utc::now());

    let updated = active
        .update(db)
        .await
        .map_err(|e| ApiError::internal("Failed to update user profile.", e))?;

    Ok(Json(ApiResponse::success(
        UserProfileResponse::from(&updated),
        "Profile updated successfully",
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_data_urls() {
        assert!(normalize_profile_image("http://example.com/pic.png").is_err());
        assert!(normalize_profile_image("data:text/plain;base64,aGVsbG8=").is_err());
    }

    #[test]
    fn accepts_small_png_data_url() {
        let url = format!("data:image/png;base64,{}", BASE64.encode(b"tinypng"));
        let normalized = normalize_profile_image(&url).unwrap().unwrap();
        assert!(normalized.starts_with("data:image/png;base64,"));
    }

    #[test]
    fn empty_input_clears_the_image() {
        assert_eq!(normalize_profile_image("   ").unwrap(), None);
    }

    #[test]
    fn oversized_image_is_rejected() {
        let blob = vec![0u8; MAX_PROFILE_IMAGE_BYTES + 1];
        let url = format!("data:image/png;base64,{}", BASE64.encode(&blob));
        assert!(normalize_profile_image(&url).is_err());
    }
}
