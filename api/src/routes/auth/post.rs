use axum::{
    Json,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::auth::extractors::extract_bearer_token;
use crate::auth::{generate_jwt, verify_jwt};
use crate::response::{ApiError, ApiResponse};
use crate::services::email::{EmailError, EmailService};
use crate::state::AppState;
use common::config::Config;
use common::format_validation_errors;
use db::models::user::{Model as User, Role};

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AuthUserResponse {
    pub id: i64,
    pub email: String,
    pub username: Option<String>,
    pub role: Role,
    pub token: String,
    pub expires_at: String,
}

impl AuthUserResponse {
    fn from_user(user: &User) -> Self {
        let (token, expires_at) = generate_jwt(user);
        Self {
            id: user.id,
            email: user.email.clone(),
            username: user.username.clone(),
            role: user.role,
            token,
            expires_at,
        }
    }
}

/// POST /api/auth/register
///
/// Register a new user account with the default `USER` role.
///
/// ### Request Body
/// ```json
/// {
///   "email": "user@example.com",
///   "password": "strongpassword"
/// }
/// ```
///
/// ### Responses
///
/// - `201 Created`
/// ```json
/// {
///   "success": true,
///   "data": {
///     "id": 1,
///     "email": "user@example.com",
///     "username": null,
///     "role": "USER",
///     "token": "jwt_token_here",
///     "expires_at": "2026-01-17T11:00:00Z"
///   },
///   "message": "User registered successfully"
/// }
/// ```
///
/// - `400 Bad Request` (validation failure)
/// - `409 Conflict` ("Email is already registered.")
pub async fn register(
    State(app_state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if let Err(validation_errors) = req.validate() {
        return Err(ApiError::Validation(format_validation_errors(
            &validation_errors,
        )));
    }

    let db = app_state.db();

    let existing = User::find_by_email(db, &req.email)
        .await
        .map_err(|e| ApiError::internal("Failed to register user.", e))?;
    if existing.is_some() {
        return Err(ApiError::Conflict("Email is already registered.".into()));
    }

    match User::create(db, &req.email, &req.password, Role::User).await {
        Ok(user) => Ok((
            StatusCode::CREATED,
            Json(ApiResponse::success(
                AuthUserResponse::from_user(&user),
                "User registered successfully",
            )),
        )),
        Err(e) if db::is_unique_violation(&e) => {
            Err(ApiError::Conflict("Email is already registered.".into()))
        }
        Err(e) => Err(ApiError::internal("Failed to register user.", e)),
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Email is required"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// POST /api/auth/login
///
/// Authenticate an existing user and issue a fresh session token.
///
/// Unknown emails and wrong passwords are deliberately indistinguishable
/// in the response.
pub async fn login(
    State(app_state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if let Err(validation_errors) = req.validate() {
        return Err(ApiError::Validation(format_validation_errors(
            &validation_errors,
        )));
    }

    let db = app_state.db();

    let user = User::find_by_email(db, &req.email)
        .await
        .map_err(|e| ApiError::internal("Failed to login user.", e))?
        .ok_or_else(|| ApiError::Authentication("Invalid email or password.".into()))?;

    if !user.verify_password(&req.password) {
        return Err(ApiError::Authentication("Invalid email or password.".into()));
    }

    Ok(Json(ApiResponse::success(
        AuthUserResponse::from_user(&user),
        "Login successful",
    )))
}

/// POST /api/auth/logout
///
/// Stateless logout: tokens are never revoked server-side, the client
/// simply discards its copy and the token ages out.
pub async fn logout() -> impl IntoResponse {
    Json(ApiResponse::success((), "Logged out successfully."))
}

/// POST /api/auth/reissue
///
/// Issues a fresh token for the bearer of a still-valid token. The user
/// row is re-read so the new token carries the current role, not the one
/// cached in the old token.
pub async fn reissue_token(
    State(app_state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError> {
    let token = extract_bearer_token(&headers)
        .ok_or_else(|| ApiError::Authentication("Missing authorization token.".into()))?;
    let claims =
        verify_jwt(&token).map_err(|_| ApiError::Authentication("Invalid token.".into()))?;

    let db = app_state.db();
    let user = User::find_by_id(db, claims.sub)
        .await
        .map_err(|e| ApiError::internal("Failed to reissue token.", e))?
        .ok_or_else(|| ApiError::NotFound("User not found.".into()))?;

    Ok(Json(ApiResponse::success(
        AuthUserResponse::from_user(&user),
        "Token reissued",
    )))
}

#[derive(Debug, Deserialize)]
pub struct PasswordResetRequest {
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct VerifyResetTokenRequest {
    #[serde(rename = "resetToken")]
    pub reset_token: String,
}

#[derive(Debug, Deserialize)]
pub struct ResetPasswordRequest {
    #[serde(rename = "resetToken")]
    pub reset_token: String,
    #[serde(rename = "newPassword")]
    pub new_password: String,
}

#[derive(Debug, Serialize)]
pub struct VerifyResetTokenResponse {
    pub valid: bool,
    pub email: String,
}

/// POST /api/auth/password-reset/request
///
/// Issues a single-use reset token and emails it to the account address.
/// If the email cannot be delivered the token is rolled back, so a token
/// is only ever valid after a confirmed delivery.
pub async fn request_password_reset(
    State(app_state): State<AppState>,
    Json(req): Json<PasswordResetRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if req.email.trim().is_empty() {
        return Err(ApiError::Validation("Email is required.".into()));
    }

    let db = app_state.db();
    let user = User::find_by_email(db, &req.email)
        .await
        .map_err(|e| ApiError::internal("Failed to process password reset request.", e))?
        .ok_or_else(|| ApiError::NotFound("User not found.".into()))?;

    let expiry_minutes = Config::get().reset_token_expiry_minutes;
    let (user, token) = user
        .issue_reset_token(db, expiry_minutes)
        .await
        .map_err(|e| ApiError::internal("Failed to process password reset request.", e))?;

    if let Err(send_err) = EmailService::send_password_reset_email(&user.email, &token).await {
        tracing::error!(error = %send_err, "Failed to send password reset email");
        // No token may stay valid without a delivered email.
        user.clear_reset_token(db)
            .await
            .map_err(|e| ApiError::internal("Failed to process password reset request.", e))?;

        let message = match send_err {
            EmailError::NotConfigured => "Email service is not configured.",
            _ => "Failed to send password reset email.",
        };
        return Err(ApiError::Internal(message.into()));
    }

    Ok(Json(ApiResponse::success(
        (),
        "Password reset token sent to email.",
    )))
}

/// POST /api/auth/password-reset/verify
///
/// Checks a reset token without consuming it. Expired tokens are reported
/// distinctly from unknown ones.
pub async fn verify_reset_token(
    State(app_state): State<AppState>,
    Json(req): Json<VerifyResetTokenRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let token = req.reset_token.trim();
    if token.is_empty() {
        return Err(ApiError::Validation("resetToken is required.".into()));
    }

    let db = app_state.db();
    let user = User::find_by_reset_token(db, token)
        .await
        .map_err(|e| ApiError::internal("Failed to verify token.", e))?;

    match user {
        Some(user) if user.reset_token_usable() => Ok(Json(ApiResponse::success(
            VerifyResetTokenResponse {
                valid: true,
                email: user.email,
            },
            "Token is valid.",
        ))),
        Some(_) => Err(ApiError::Validation(
            "Token has expired. Please request a new one.".into(),
        )),
        None => Err(ApiError::Validation("Invalid token.".into())),
    }
}

/// POST /api/auth/password-reset/confirm
///
/// Consumes a valid reset token and stores the new password. The token is
/// cleared unconditionally (single use).
pub async fn reset_password(
    State(app_state): State<AppState>,
    Json(req): Json<ResetPasswordRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let token = req.reset_token.trim();
    if token.is_empty() || req.new_password.is_empty() {
        return Err(ApiError::Validation(
            "resetToken and newPassword are required.".into(),
        ));
    }

    let db = app_state.db();
    let user = User::find_by_reset_token(db, token)
        .await
        .map_err(|e| ApiError::internal("Failed to reset password.", e))?
        .filter(|user| user.reset_token_usable())
        .ok_or_else(|| ApiError::Validation("Invalid or expired token.".into()))?;

    let user = user
        .reset_password(db, &req.new_password)
        .await
        .map_err(|e| ApiError::internal("Failed to reset password.", e))?;

    // Best-effort notification; the reset already succeeded.
    if let Err(e) = EmailService::send_password_changed_email(&user.email).await {
        tracing::warn!(error = %e, "Failed to send password changed email");
    }

    Ok(Json(ApiResponse::success(
        (),
        "Password updated successfully.",
    )))
}
