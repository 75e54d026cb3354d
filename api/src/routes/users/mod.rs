use axum::{
    Router,
    middleware::from_fn,
    routing::{delete, get, patch, post, put},
};

use crate::auth::guards::{require_admin, require_authenticated};
use crate::state::AppState;

pub mod delete;
pub mod get;
pub mod patch;
pub mod post;
pub mod put;

/// Builds the `/users` route group.
///
/// Admin management endpoints sit behind the admin gate (and re-check the
/// database); profile and enrollment reads follow the public surface of
/// the original API.
pub fn users_routes() -> Router<AppState> {
    Router::new()
        .merge(
            Router::new()
                .route("/", get(get::list_users))
                .route("/roles", get(get::list_user_roles))
                .route("/{user_id}/role", patch(patch::update_user_role))
                .route_layer(from_fn(require_admin)),
        )
        .merge(
            Router::new()
                .route("/change-password", post(post::change_password))
                .route_layer(from_fn(require_authenticated)),
        )
        .route("/{user_id}", get(get::get_user_profile))
        .route("/{user_id}", put(put::update_user_profile))
        .route("/{user_id}/classes", get(get::get_user_enrolled_classes))
        .route(
            "/{user_id}/classes/{class_id}",
            delete(delete::delete_user_class_enrollment),
        )
}
