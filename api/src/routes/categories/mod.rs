use axum::{
    Router,
    middleware::from_fn,
    routing::{delete, get, post, put},
};

use crate::auth::guards::require_admin;
use crate::state::AppState;

pub mod delete;
pub mod get;
pub mod post;
pub mod put;

/// Builds the `/class-categories` route group. Listing is public; every
/// mutation sits behind the admin gate and re-checks the database row.
pub fn categories_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(get::list_categories))
        .merge(
            Router::new()
                .route("/", post(post::create_category))
                .route("/{category_id}", put(put::update_category))
                .route("/{category_id}", delete(delete::delete_category))
                .route_layer(from_fn(require_admin)),
        )
}
