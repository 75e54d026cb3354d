use axum::{
    Router,
    middleware::from_fn,
    routing::{delete, get, post, put},
};

use crate::auth::guards::{attach_auth_if_present, require_admin, require_authenticated};
use crate::state::AppState;

pub mod common;
pub mod delete;
pub mod get;
pub mod post;
pub mod put;

/// Builds the `/classes` route group.
///
/// The catalog is public. Enrollment and the trainer's own schedule need a
/// valid token; class CRUD is admin-gated at the route layer and re-checked
/// against the database inside the handlers.
pub fn classes_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(get::list_classes))
        .route("/upcoming", get(get::list_upcoming_classes))
        .route(
            "/trainer/{trainer_id}",
            get(get::list_trainer_classes).layer(from_fn(attach_auth_if_present)),
        )
        .route("/{class_id}", get(get::get_class_by_id))
        .route("/{class_id}/enrollments", get(get::list_class_enrollments))
        .merge(
            Router::new()
                .route("/mine", get(get::get_my_classes))
                .route("/{class_id}/enroll", post(post::enroll_in_class))
                .route_layer(from_fn(require_authenticated)),
        )
        .merge(
            Router::new()
                .route("/", post(post::create_class))
                .route("/{class_id}", put(put::update_class))
                .route("/{class_id}", delete(delete::delete_class))
                .route_layer(from_fn(require_admin)),
        )
}
