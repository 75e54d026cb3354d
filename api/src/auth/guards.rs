use axum::{
    Json,
    body::Body,
    http::{Request, StatusCode},
    middleware::Next,
    response::Response,
};
use sea_orm::DatabaseConnection;

use crate::auth::claims::AuthUser;
use crate::auth::extractors::extract_bearer_token;
use crate::auth::verify_jwt;
use crate::response::{ApiError, ApiResponse, Empty};
use db::models::user::{self, Role};

// --- Route-level gates ---
//
// Per-request state machine, terminal states only:
//
// | Gate                    | No token | Invalid token | Wrong role | Right role |
// |-------------------------|----------|---------------|------------|------------|
// | attach_auth_if_present  | proceed  | proceed       | proceed    | proceed    |
// | require_authenticated   | 401      | 401           | proceed    | proceed    |
// | require_admin           | 401      | 401           | 403        | proceed    |

/// Optional-attach gate: decodes a token when one is present and valid,
/// otherwise lets the request through with an empty context. Invalid
/// tokens are swallowed here; enforcement belongs to the require_* gates.
pub async fn attach_auth_if_present(mut req: Request<Body>, next: Next) -> Response {
    if let Some(token) = extract_bearer_token(req.headers()) {
        if let Ok(claims) = verify_jwt(&token) {
            req.extensions_mut().insert(AuthUser(claims));
        }
    }
    next.run(req).await
}

/// Basic gate to ensure the request is authenticated.
pub async fn require_authenticated(
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, (StatusCode, Json<ApiResponse<Empty>>)> {
    let token = extract_bearer_token(req.headers()).ok_or((
        StatusCode::UNAUTHORIZED,
        Json(ApiResponse::error("Missing authorization token.")),
    ))?;

    let claims = verify_jwt(&token).map_err(|_| {
        (
            StatusCode::UNAUTHORIZED,
            Json(ApiResponse::error("Invalid token.")),
        )
    })?;

    req.extensions_mut().insert(AuthUser(claims));
    Ok(next.run(req).await)
}

/// Admin-only gate. The role check here trusts the token; handlers behind
/// it re-check the database row before privileged mutations.
pub async fn require_admin(
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, (StatusCode, Json<ApiResponse<Empty>>)> {
    let token = extract_bearer_token(req.headers()).ok_or((
        StatusCode::UNAUTHORIZED,
        Json(ApiResponse::error("Missing authorization token.")),
    ))?;

    let claims = verify_jwt(&token).map_err(|_| {
        (
            StatusCode::UNAUTHORIZED,
            Json(ApiResponse::error("Invalid token.")),
        )
    })?;

    if claims.role != Role::Admin {
        return Err((
            StatusCode::FORBIDDEN,
            Json(ApiResponse::error("Only admins can perform this action.")),
        ));
    }

    req.extensions_mut().insert(AuthUser(claims));
    Ok(next.run(req).await)
}

// --- Handler-level re-checks ---

/// Loads the acting user and asserts ADMIN against the current database
/// state. The token-embedded role is a cache that may be stale; this is
/// the authoritative check for privileged mutations, so a role downgrade
/// takes effect immediately even while old tokens are still valid.
pub async fn require_current_admin(
    db: &DatabaseConnection,
    user_id: i64,
    failure_msg: &str,
) -> Result<user::Model, ApiError> {
    let acting = user::Model::find_by_id(db, user_id)
        .await
        .map_err(|e| ApiError::internal("Failed to verify admin role.", e))?;

    match acting {
        Some(u) if u.role == Role::Admin => Ok(u),
        _ => Err(ApiError::Authorization(failure_msg.to_owned())),
    }
}
