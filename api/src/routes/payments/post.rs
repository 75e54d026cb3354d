use axum::{
    Json,
    extract::{Multipart, State},
    http::StatusCode,
    response::IntoResponse,
};
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;

use crate::response::{ApiError, ApiResponse};
use crate::state::AppState;
use db::models::payment_proof::Model as PaymentProof;
use db::models::user::Model as User;

/// POST /api/payments
///
/// Multipart upload of a transfer slip. Fields:
/// - `paymentImage` (required file, ≤ 5 MiB)
/// - `userId`, `amount`, `note` (optional)
///
/// The image is stored inline as base64 on the row.
///
/// ### Responses
/// - `201 Created` with the stored proof (sans image payload)
/// - `400 Bad Request` (missing file, non-numeric userId/amount)
/// - `404 Not Found` ("User not found.")
pub async fn upload_payment_proof(
    State(app_state): State<AppState>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let mut user_id: Option<i64> = None;
    let mut amount: Option<i32> = None;
    let mut note: Option<String> = None;
    let mut image: Option<(String, String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| ApiError::Validation("Invalid multipart payload.".into()))?
    {
        match field.name().unwrap_or_default() {
            "paymentImage" => {
                let filename = field
                    .file_name()
                    .map(str::to_owned)
                    .unwrap_or_else(|| "payment-proof".into());
                let mime_type = field
                    .content_type()
                    .map(str::to_owned)
                    .unwrap_or_else(|| "application/octet-stream".into());
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|_| ApiError::Validation("paymentImage file is too large.".into()))?;
                image = Some((filename, mime_type, bytes.to_vec()));
            }
            "userId" => {
                let raw = field.text().await.unwrap_or_default();
                if !raw.is_empty() {
                    user_id = Some(
                        raw.parse()
                            .map_err(|_| ApiError::Validation("userId must be a number.".into()))?,
                    );
                }
            }
            "amount" => {
                let raw = field.text().await.unwrap_or_default();
                if !raw.is_empty() {
                    amount = Some(
                        raw.parse()
                            .map_err(|_| ApiError::Validation("amount must be a number.".into()))?,
                    );
                }
            }
            "note" => {
                let raw = field.text().await.unwrap_or_default();
                if !raw.is_empty() {
                    note = Some(raw);
                }
            }
            _ => {}
        }
    }

    let (filename, mime_type, bytes) =
        image.ok_or_else(|| ApiError::Validation("paymentImage file is required.".into()))?;

    let db = app_state.db();

    if let Some(user_id) = user_id {
        User::find_by_id(db, user_id)
            .await
            .map_err(|e| ApiError::internal("Failed to store payment proof.", e))?
            .ok_or_else(|| ApiError::NotFound("User not found.".into()))?;
    }

    let proof = PaymentProof::create(
        db,
        user_id,
        amount,
        note.as_deref(),
        &filename,
        &mime_type,
        BASE64.encode(&bytes),
    )
    .await
    .map_err(|e| ApiError::internal("Failed to store payment proof.", e))?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(proof, "Payment proof stored")),
    ))
}
