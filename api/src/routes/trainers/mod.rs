use axum::{Router, routing::get};

use crate::state::AppState;

pub mod get;

/// Builds the `/trainers` route group. The directory is fully public.
pub fn trainers_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(get::list_trainers))
        .route("/{trainer_id}", get(get::get_trainer_by_id))
}
