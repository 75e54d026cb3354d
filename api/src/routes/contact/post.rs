use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::Deserialize;
use validator::Validate;

use crate::response::{ApiError, ApiResponse};
use crate::services::email::EmailService;
use crate::state::AppState;
use common::format_validation_errors;
use db::models::contact_request::Model as ContactRequest;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateContactRequest {
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,

    #[validate(email(message = "email must be a valid email address"))]
    pub email: String,

    #[validate(length(min = 1, message = "phoneNumber is required"))]
    pub phone_number: String,

    #[validate(length(min = 1, message = "subject is required"))]
    pub subject: String,

    #[validate(length(min = 1, message = "message is required"))]
    pub message: String,
}

/// POST /api/contact
///
/// Stores a contact-form submission and forwards it to the studio
/// mailbox. Email delivery is best-effort; the submission succeeds even
/// when the mailer is down or unconfigured.
pub async fn create_contact_request(
    State(app_state): State<AppState>,
    Json(req): Json<CreateContactRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if let Err(validation_errors) = req.validate() {
        return Err(ApiError::Validation(format_validation_errors(
            &validation_errors,
        )));
    }

    let request = ContactRequest::create(
        app_state.db(),
        &req.name,
        &req.email,
        &req.phone_number,
        &req.subject,
        &req.message,
    )
    .await
    .map_err(|e| ApiError::internal("Failed to store contact request.", e))?;

    if let Err(e) = EmailService::send_contact_notification(&request).await {
        tracing::warn!(error = %e, "Failed to send contact notification email");
    }

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(request, "Contact request received")),
    ))
}
