use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware::from_fn,
    routing::{get, post},
};
use sea_orm::DatabaseConnection;

use crate::auth::AuthUser;
use crate::auth::guards::require_current_admin;
use crate::response::ApiError;
use crate::state::AppState;

pub mod get;
pub mod post;

/// Upload cap for payment-proof images.
pub const MAX_PAYMENT_IMAGE_BYTES: usize = 5 * 1024 * 1024;

/// Builds the `/payments` route group.
///
/// Uploads are open (the bearer token is attached when present); every
/// read is admin-gated, with a legacy `adminId` query fallback for
/// clients that never attached a token.
pub fn payments_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(post::upload_payment_proof))
        .route("/", get(get::list_payment_proofs))
        .route("/all", get(get::list_all_payment_proofs))
        .route("/{payment_id}/image", get(get::get_payment_proof_image))
        .layer(DefaultBodyLimit::max(MAX_PAYMENT_IMAGE_BYTES))
        .layer(from_fn(crate::auth::guards::attach_auth_if_present))
}

/// Admin check with the query-parameter fallback: a bearer token wins when
/// present; otherwise `adminId` must name an admin user. Both paths
/// consult the database row, never the token role alone.
pub(super) async fn ensure_admin_access(
    db: &DatabaseConnection,
    auth: &Option<AuthUser>,
    admin_id_param: Option<&str>,
) -> Result<(), ApiError> {
    if let Some(AuthUser(claims)) = auth {
        require_current_admin(db, claims.sub, "Only admins can view payment proofs.").await?;
        return Ok(());
    }

    let raw = admin_id_param
        .ok_or_else(|| ApiError::Validation("adminId query parameter is required.".into()))?;
    let admin_id: i64 = raw
        .parse()
        .map_err(|_| ApiError::Validation("adminId must be a number.".into()))?;

    require_current_admin(db, admin_id, "Only admins can view payment proofs.").await?;
    Ok(())
}
