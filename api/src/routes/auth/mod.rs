use axum::{Router, routing::post};

use crate::state::AppState;

pub mod post;

/// Builds the `/auth` route group. All endpoints are public; the password
/// reset flow is token-gated by its own out-of-band token.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(post::register))
        .route("/login", post(post::login))
        .route("/logout", post(post::logout))
        .route("/reissue", post(post::reissue_token))
        .route("/password-reset/request", post(post::request_password_reset))
        .route("/password-reset/verify", post(post::verify_reset_token))
        .route("/password-reset/confirm", post(post::reset_password))
}
