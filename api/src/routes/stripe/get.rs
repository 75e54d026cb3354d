use axum::{
    Json,
    extract::{Query, State},
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};

use crate::response::{ApiError, ApiResponse};
use crate::routes::stripe::apply_paid_purchase;
use crate::services::stripe::StripeClient;
use crate::state::AppState;
use db::models::membership_purchase::Model as MembershipPurchase;
use db::models::user::Role;

#[derive(Debug, Deserialize)]
pub struct VerifyQuery {
    pub session_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct VerifyResponse {
    pub session_id: String,
    pub paid: bool,
    pub role: Role,
}

/// GET /api/stripe/verify?session_id=...
///
/// Polling fallback for missed webhooks: asks the gateway for the session
/// state and applies the upgrade when it reports paid.
pub async fn verify_session(
    State(app_state): State<AppState>,
    Query(query): Query<VerifyQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let session_id = query
        .session_id
        .as_deref()
        .ok_or_else(|| ApiError::Validation("session_id required".into()))?;

    let db = app_state.db();
    let purchase = MembershipPurchase::find_by_session(db, session_id)
        .await
        .map_err(|e| ApiError::internal("Failed to verify session.", e))?
        .ok_or_else(|| ApiError::NotFound("Checkout session not found.".into()))?;

    // Already settled locally; no gateway round-trip needed.
    if purchase.is_paid() {
        return Ok(Json(ApiResponse::success(
            VerifyResponse {
                session_id: purchase.session_id.clone(),
                paid: true,
                role: purchase.role,
            },
            "Session verified",
        )));
    }

    let client = StripeClient::from_config().map_err(|e| {
        tracing::error!(error = %e, "Payment gateway unavailable");
        ApiError::Internal("Failed to verify session.".into())
    })?;
    let session = client
        .retrieve_checkout_session(session_id)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Checkout session retrieval failed");
            ApiError::Internal("Failed to verify session.".into())
        })?;

    let purchase = if session.is_paid() {
        apply_paid_purchase(db, purchase).await?
    } else {
        purchase
    };

    Ok(Json(ApiResponse::success(
        VerifyResponse {
            session_id: purchase.session_id.clone(),
            paid: purchase.is_paid(),
            role: purchase.role,
        },
        "Session verified",
    )))
}
