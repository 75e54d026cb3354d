//! Email service for outbound SMTP delivery.
//!
//! Uses the `lettre` crate with a lazily built async SMTP transport. The
//! transport is only available when SMTP credentials are configured;
//! callers decide whether a missing configuration is fatal (password
//! resets) or tolerable (contact-form notifications).

use lettre::{
    AsyncTransport, Tokio1Executor,
    message::{Message, MultiPart, SinglePart, header},
    transport::smtp::{
        AsyncSmtpTransport,
        authentication::Credentials,
        client::{Tls, TlsParameters},
    },
};
use once_cell::sync::Lazy;

use common::config::Config;
use db::models::contact_request;

/// Global SMTP client, `None` when no credentials are configured.
static SMTP_CLIENT: Lazy<Option<AsyncSmtpTransport<Tokio1Executor>>> = Lazy::new(|| {
    let config = Config::get();
    if config.smtp_username.is_empty() || config.smtp_password.is_empty() {
        return None;
    }

    let tls_parameters =
        TlsParameters::new(config.smtp_host.clone()).expect("Failed to create TLS parameters");

    Some(
        AsyncSmtpTransport::<Tokio1Executor>::relay(&config.smtp_host)
            .expect("Failed to create SMTP transport")
            .port(587)
            .tls(Tls::Required(tls_parameters))
            .credentials(Credentials::new(
                config.smtp_username.clone(),
                config.smtp_password.clone(),
            ))
            .build(),
    )
});

#[derive(Debug, thiserror::Error)]
pub enum EmailError {
    #[error("Email service is not configured.")]
    NotConfigured,

    #[error(transparent)]
    Address(#[from] lettre::address::AddressError),

    #[error(transparent)]
    Build(#[from] lettre::error::Error),

    #[error(transparent)]
    Transport(#[from] lettre::transport::smtp::Error),
}

/// Service for handling email-related operations.
pub struct EmailService;

impl EmailService {
    /// Sends a password-reset token to the given address.
    ///
    /// Callers must treat a failure as a rollback signal: the issued token
    /// gets cleared again so no token stays valid without a delivered
    /// email.
    pub async fn send_password_reset_email(
        to_email: &str,
        reset_token: &str,
    ) -> Result<(), EmailError> {
        let client = SMTP_CLIENT.as_ref().ok_or(EmailError::NotConfigured)?;
        let config = Config::get();
        let from_name = &config.email_from_name;

        let email = Message::builder()
            .from(format!("{} <{}>", from_name, config.smtp_username).parse()?)
            .to(to_email.parse()?)
            .subject("Password Reset Request")
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(header::ContentType::TEXT_PLAIN)
                            .body(format!(
                                "Hello,\n\n\
                                We received a request to reset your password. Use the following token to reset your password:\n\n\
                                Token: {}\n\n\
                                If you did not request this, please ignore this email.\n\n\
                                Thank you,\n\
                                {}",
                                reset_token, from_name
                            )),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(header::ContentType::TEXT_HTML)
                            .body(format!(
                                "<p>Hello,</p>\
                                <p>We received a request to reset your password. Use the following token to reset your password:</p>\
                                <p><strong>Token:</strong> {}</p>\
                                <p>If you did not request this, please ignore this email.</p>\
                                <p>Thank you,<br/>{}</p>",
                                reset_token, from_name
                            )),
                    ),
            )?;

        client.send(email).await?;
        Ok(())
    }

    /// Sends a confirmation after a successful password change.
    pub async fn send_password_changed_email(to_email: &str) -> Result<(), EmailError> {
        let client = SMTP_CLIENT.as_ref().ok_or(EmailError::NotConfigured)?;
        let config = Config::get();
        let from_name = &config.email_from_name;

        let email = Message::builder()
            .from(format!("{} <{}>", from_name, config.smtp_username).parse()?)
            .to(to_email.parse()?)
            .subject("Your Password Has Been Changed")
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(header::ContentType::TEXT_PLAIN)
                            .body(format!(
                                "Hello,\n\n\
                                Your password has been successfully changed.\n\n\
                                If you did not make this change, please contact support immediately.\n\n\
                                Best regards,\n\
                                {}",
                                from_name
                            )),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(header::ContentType::TEXT_HTML)
                            .body(format!(
                                "<p>Hello,</p>\
                                <p>Your password has been successfully changed.</p>\
                                <p>If you did not make this change, please contact support immediately.</p>\
                                <p>Best regards,<br/>{}</p>",
                                from_name
                            )),
                    ),
            )?;

        client.send(email).await?;
        Ok(())
    }

    /// Forwards a contact-form submission to the studio mailbox.
    /// Best-effort: callers log failures but never fail the request.
    pub async fn send_contact_notification(
        request: &contact_request::Model,
    ) -> Result<(), EmailError> {
        let client = SMTP_CLIENT.as_ref().ok_or(EmailError::NotConfigured)?;
        let config = Config::get();

        let email = Message::builder()
            .from(format!("{} <{}>", config.email_from_name, config.smtp_username).parse()?)
            .to(config.smtp_username.parse()?)
            .subject(format!("Contact request: {}", request.subject))
            .singlepart(
                SinglePart::builder()
                    .header(header::ContentType::TEXT_PLAIN)
                    .body(format!(
                        "From: {} <{}>\nPhone: {}\n\n{}",
                        request.name, request.email, request.phone_number, request.message
                    )),
            )?;

        client.send(email).await?;
        Ok(())
    }
}
