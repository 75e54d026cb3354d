use axum::{Router, routing::post};

use crate::state::AppState;

pub mod post;

/// Builds the `/contact` route group: a single public submission endpoint.
pub fn contact_routes() -> Router<AppState> {
    Router::new().route("/", post(post::create_contact_request))
}
