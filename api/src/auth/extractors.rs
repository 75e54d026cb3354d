use axum::{
    Json,
    extract::{FromRequestParts, OptionalFromRequestParts},
    http::{HeaderMap, StatusCode, header, request::Parts},
};

use crate::auth::claims::AuthUser;
use crate::response::{ApiResponse, Empty};

/// Pulls the bearer token out of the `Authorization` header.
///
/// Header-name lookup is case-insensitive. A value that does not start
/// with the literal `"Bearer "` counts as *no token*, not as a malformed
/// one.
pub fn extract_bearer_token(headers: &HeaderMap) -> Option<String> {
    let header = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    header.strip_prefix("Bearer ").map(str::to_owned)
}

/// Extraction of `AuthUser` from request extensions.
///
/// One of the auth-gate middlewares (`attach_auth_if_present`,
/// `require_authenticated`, `require_admin`) must run upstream; this
/// extractor only reads what the gate inserted.
///
/// # Errors
/// Returns `401 Unauthorized` when no authenticated context is present.
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, Json<ApiResponse<Empty>>);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts.extensions.get::<AuthUser>().cloned().ok_or((
            StatusCode::UNAUTHORIZED,
            Json(ApiResponse::error("Authentication required.")),
        ))
    }
}

/// `Option<AuthUser>` extraction for routes behind the optional-attach
/// gate: absent or invalid tokens yield `None` instead of a rejection.
impl<S> OptionalFromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> Result<Option<Self>, Self::Rejection> {
        Ok(parts.extensions.get::<AuthUser>().cloned())
    }
}
