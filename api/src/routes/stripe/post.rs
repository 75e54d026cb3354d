use axum::{
    Json,
    body::Bytes,
    extract::State,
    http::HeaderMap,
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};

use crate::response::{ApiError, ApiResponse};
use crate::routes::stripe::apply_paid_purchase;
use crate::services::stripe::{StripeClient, plan_for_price, verify_webhook_signature};
use crate::state::AppState;
use common::config::Config;
use db::models::membership_purchase::Model as MembershipPurchase;
use db::models::user::Model as User;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    pub user_id: Option<i64>,
    pub price_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CheckoutResponse {
    pub session_id: String,
    pub url: Option<String>,
}

/// POST /api/stripe/checkout
///
/// Creates a gateway checkout session for a membership plan and records
/// the purchase as pending.
///
/// ### Responses
/// - `200 OK` with the session id and redirect URL
/// - `400 Bad Request` ("userId required" / "priceId required" /
///   "invalid priceId")
/// - `404 Not Found` ("user not found")
/// - `409 Conflict` ("User already has an equal or higher role.") —
///   tiers ARE ordered for purchases, unlike the enrollment gate
pub async fn create_checkout_session(
    State(app_state): State<AppState>,
    Json(req): Json<CheckoutRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let user_id = req
        .user_id
        .ok_or_else(|| ApiError::Validation("userId required".into()))?;
    let price_id = req
        .price_id
        .as_deref()
        .ok_or_else(|| ApiError::Validation("priceId required".into()))?;
    let plan =
        plan_for_price(price_id).ok_or_else(|| ApiError::Validation("invalid priceId".into()))?;

    let db = app_state.db();
    let user = User::find_by_id(db, user_id)
        .await
        .map_err(|e| ApiError::internal("Failed to create checkout session.", e))?
        .ok_or_else(|| ApiError::NotFound("user not found".into()))?;

    if let (Some(current), Some(purchased)) = (user.role.tier_rank(), plan.role.tier_rank()) {
        if current >= purchased {
            return Err(ApiError::Conflict(
                "User already has an equal or higher role.".into(),
            ));
        }
    }

    let frontend_url = &Config::get().frontend_url;
    let success_url = format!(
        "{}/payment/success?session_id={{CHECKOUT_SESSION_ID}}",
        frontend_url
    );
    let cancel_url = format!("{}/payment/cancel", frontend_url);

    let client = StripeClient::from_config().map_err(|e| {
        tracing::error!(error = %e, "Payment gateway unavailable");
        ApiError::Internal("Failed to create checkout session.".into())
    })?;
    let session = client
        .create_checkout_session(price_id, user.id, &success_url, &cancel_url)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Checkout session creation failed");
            ApiError::Internal("Failed to create checkout session.".into())
        })?;

    MembershipPurchase::create_pending(
        db,
        user.id,
        &session.id,
        price_id,
        plan.role,
        plan.amount,
        plan.currency,
    )
    .await
    .map_err(|e| ApiError::internal("Failed to create checkout session.", e))?;

    Ok(Json(ApiResponse::success(
        CheckoutResponse {
            session_id: session.id,
            url: session.url,
        },
        "Checkout session created",
    )))
}

/// POST /api/stripe/webhook
///
/// Completion callback from the gateway. The HMAC signature is verified
/// against the raw body before anything is parsed; on
/// `checkout.session.completed` the pending purchase is marked paid and
/// the buyer's tier is upgraded.
pub async fn handle_webhook(
    State(app_state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    let signature = headers
        .get("stripe-signature")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| ApiError::Validation("Webhook Error: missing signature".into()))?;

    let secret = &Config::get().stripe_webhook_secret;
    verify_webhook_signature(&body, signature, secret)
        .map_err(|e| ApiError::Validation(format!("Webhook Error: {}", e)))?;

    let event: serde_json::Value = serde_json::from_slice(&body)
        .map_err(|_| ApiError::Validation("Webhook Error: malformed payload".into()))?;

    if event["type"].as_str() == Some("checkout.session.completed") {
        let session_id = event["data"]["object"]["id"]
            .as_str()
            .ok_or_else(|| ApiError::Validation("Webhook Error: malformed payload".into()))?;

        let db = app_state.db();
        let purchase = MembershipPurchase::find_by_session(db, session_id)
            .await
            .map_err(|e| ApiError::internal("Failed to process webhook.", e))?;

        match purchase {
            Some(purchase) => {
                apply_paid_purchase(db, purchase).await?;
            }
            // Unknown sessions are acknowledged, not retried forever.
            None => tracing::warn!(session_id, "Webhook for unknown checkout session"),
        }
    }

    Ok(Json(ApiResponse::success((), "Webhook processed")))
}
