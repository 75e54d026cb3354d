use axum::{
    Json,
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::Deserialize;

use crate::auth::AuthUser;
use crate::response::{ApiError, ApiResponse};
use crate::routes::payments::ensure_admin_access;
use crate::state::AppState;
use db::models::payment_proof::Model as PaymentProof;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListPaymentsQuery {
    pub admin_id: Option<String>,
    pub user_id: Option<String>,
}

/// GET /api/payments?userId=...
///
/// Admin listing of payment proofs, optionally filtered to one user.
/// Accepts either an admin bearer token or the legacy `adminId` query
/// parameter; both are checked against the database.
pub async fn list_payment_proofs(
    State(app_state): State<AppState>,
    auth: Option<AuthUser>,
    Query(query): Query<ListPaymentsQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let db = app_state.db();
    ensure_admin_access(db, &auth, query.admin_id.as_deref()).await?;

    let user_id = match query.user_id.as_deref() {
        Some(raw) => Some(
            raw.parse::<i64>()
                .map_err(|_| ApiError::Validation("userId must be a number.".into()))?,
        ),
        None => None,
    };

    let proofs = PaymentProof::find_filtered(db, user_id)
        .await
        .map_err(|e| ApiError::internal("Failed to fetch payment proofs.", e))?;

    Ok(Json(ApiResponse::success(proofs, "Payment proofs fetched")))
}

/// GET /api/payments/all
///
/// Unfiltered admin listing.
pub async fn list_all_payment_proofs(
    State(app_state): State<AppState>,
    auth: Option<AuthUser>,
    Query(query): Query<ListPaymentsQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let db = app_state.db();
    ensure_admin_access(db, &auth, query.admin_id.as_deref()).await?;

    let proofs = PaymentProof::find_filtered(db, None)
        .await
        .map_err(|e| ApiError::internal("Failed to fetch payment proofs.", e))?;

    Ok(Json(ApiResponse::success(proofs, "Payment proofs fetched")))
}

/// GET /api/payments/{payment_id}/image
///
/// Streams the stored image back with its original content type, inline.
pub async fn get_payment_proof_image(
    State(app_state): State<AppState>,
    auth: Option<AuthUser>,
    Query(query): Query<ListPaymentsQuery>,
    Path(payment_id): Path<i64>,
) -> Result<Response, ApiError> {
    let db = app_state.db();
    ensure_admin_access(db, &auth, query.admin_id.as_deref()).await?;

    let proof = PaymentProof::find_by_id(db, payment_id)
        .await
        .map_err(|e| ApiError::internal("Failed to fetch payment proof image.", e))?
        .ok_or_else(|| ApiError::NotFound("Payment proof not found.".into()))?;

    let bytes = BASE64
        .decode(proof.image_base64.as_bytes())
        .map_err(|_| ApiError::Internal("Failed to fetch payment proof image.".into()))?;

    let response = (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, proof.mime_type.clone()),
            (
                header::CONTENT_DISPOSITION,
                format!("inline; filename=\"{}\"", proof.filename),
            ),
        ],
        bytes,
    );
    Ok(response.into_response())
}
