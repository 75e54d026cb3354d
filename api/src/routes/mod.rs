//! HTTP route entry point for `/api/...`.
//!
//! Routes are organized by domain, each protected via the appropriate
//! access-control middleware:
//! - `/health` → liveness probe (public)
//! - `/auth` → registration, login, token reissue, password reset (public)
//! - `/users` → profile, enrollments, admin user management
//! - `/classes` → class catalog, CRUD (admin), enrollment
//! - `/class-categories` → category catalog, CRUD (admin)
//! - `/trainers` → public trainer directory
//! - `/reviews` → trainer reviews
//! - `/payments` → payment-proof uploads and admin listing
//! - `/contact` → contact-form submissions
//! - `/stripe` → membership checkout, webhook, verification

use axum::Router;

use crate::state::AppState;

pub mod auth;
pub mod categories;
pub mod classes;
pub mod contact;
pub mod health;
pub mod payments;
pub mod reviews;
pub mod stripe;
pub mod trainers;
pub mod users;

/// Builds the complete application router for all HTTP endpoints.
pub fn routes(app_state: AppState) -> Router {
    Router::new()
        .nest("/health", health::health_routes())
        .nest("/auth", auth::auth_routes())
        .nest("/users", users::users_routes())
        .nest("/classes", classes::classes_routes())
        .nest("/class-categories", categories::categories_routes())
        .nest("/trainers", trainers::trainers_routes())
        .nest("/reviews", reviews::reviews_routes())
        .nest("/payments", payments::payments_routes())
        .nest("/contact", contact::contact_routes())
        .nest("/stripe", stripe::stripe_routes())
        .with_state(app_state)
}
