use axum::{
    Router,
    middleware::from_fn,
    routing::{delete, get, post},
};

use crate::auth::guards::require_admin;
use crate::state::AppState;

pub mod common;
pub mod delete;
pub mod get;
pub mod post;

/// Builds the `/reviews` route group. Reads are public; creation extracts
/// the reviewer from the bearer token inside the handler; deletion is
/// admin-only.
pub fn reviews_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(get::list_reviews))
        .route("/", post(post::create_review))
        .route("/summary", get(get::get_review_summary))
        .route("/trainer/{trainer_id}", get(get::get_trainer_reviews))
        .merge(
            Router::new()
                .route("/{review_id}", delete(delete::delete_review))
                .route_layer(from_fn(require_admin)),
        )
}
