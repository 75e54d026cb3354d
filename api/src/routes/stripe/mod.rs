use axum::{
    Router,
    routing::{get, post},
};
use sea_orm::DatabaseConnection;

use crate::response::ApiError;
use crate::state::AppState;
use db::models::membership_purchase::Model as MembershipPurchase;
use db::models::user::Model as User;

pub mod get;
pub mod post;

/// Builds the `/stripe` route group: checkout-session creation, the
/// completion webhook, and a polling fallback for missed webhooks.
pub fn stripe_routes() -> Router<AppState> {
    Router::new()
        .route("/checkout", post(post::create_checkout_session))
        .route("/webhook", post(post::handle_webhook))
        .route("/verify", get(get::verify_session))
}

/// Marks a purchase paid and upgrades the buyer's membership tier.
///
/// Idempotent: an already-paid purchase is returned unchanged, so the
/// webhook and the verify fallback can both run for the same session. The
/// role only ever moves up; a purchase can never downgrade an account.
pub(super) async fn apply_paid_purchase(
    db: &DatabaseConnection,
    purchase: MembershipPurchase,
) -> Result<MembershipPurchase, ApiError> {
    if purchase.is_paid() {
        return Ok(purchase);
    }

    let user = User::find_by_id(db, purchase.user_id)
        .await
        .map_err(|e| ApiError::internal("Failed to apply purchase.", e))?
        .ok_or_else(|| ApiError::NotFound("User not found.".into()))?;

    let upgrade = match (user.role.tier_rank(), purchase.role.tier_rank()) {
        (Some(current), Some(purchased)) => purchased > current,
        _ => false,
    };
    if upgrade {
        user.update_role(db, purchase.role)
            .await
            .map_err(|e| ApiError::internal("Failed to apply purchase.", e))?;
    }

    purchase
        .mark_paid(db)
        .await
        .map_err(|e| ApiError::internal("Failed to apply purchase.", e))
}
