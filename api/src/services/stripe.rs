//! Minimal Stripe client.
//!
//! The gateway is treated as opaque: a thin `reqwest` wrapper around the
//! two checkout-session calls this service needs, plus webhook signature
//! verification. Only the plan table below is business logic.

use std::collections::HashMap;

use chrono::Utc;
use hmac::{Hmac, Mac};
use serde::Deserialize;
use sha2::Sha256;

use common::config::Config;
use db::models::user::Role;

type HmacSha256 = Hmac<Sha256>;

/// Maximum accepted age of a webhook signature timestamp.
const WEBHOOK_TOLERANCE_SECS: i64 = 300;

/// A purchasable membership plan, keyed by its Stripe price ID.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plan {
    pub role: Role,
    /// Amount in the currency's minor unit (satang).
    pub amount: i32,
    pub currency: &'static str,
    pub label: &'static str,
}

pub fn plan_for_price(price_id: &str) -> Option<Plan> {
    match price_id {
        "price_1SHi6U3JFtC2WMSKhAQeq9c8" => Some(Plan {
            role: Role::UserBronze,
            amount: 49_900,
            currency: "THB",
            label: "Bronze 499",
        }),
        "price_1SHi5X3JFtC2WMSKqqCbjHoV" => Some(Plan {
            role: Role::UserGold,
            amount: 129_900,
            currency: "THB",
            label: "Gold 1299",
        }),
        "price_1SHi7b3JFtC2WMSKRkKDIGL0" => Some(Plan {
            role: Role::UserPlatinum,
            amount: 299_900,
            currency: "THB",
            label: "Platinum 2999",
        }),
        _ => None,
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StripeError {
    #[error("Payment gateway is not configured.")]
    NotConfigured,

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error("Gateway returned {status}: {body}")]
    Api { status: u16, body: String },
}

/// A checkout session as returned by the gateway. Only the fields this
/// service reads are deserialized.
#[derive(Debug, Deserialize)]
pub struct CheckoutSession {
    pub id: String,
    pub url: Option<String>,
    pub payment_status: Option<String>,
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

impl CheckoutSession {
    pub fn is_paid(&self) -> bool {
        self.payment_status.as_deref() == Some("paid")
    }
}

pub struct StripeClient {
    http: reqwest::Client,
    secret_key: String,
    base_url: String,
}

impl StripeClient {
    pub fn from_config() -> Result<Self, StripeError> {
        let config = Config::get();
        if config.stripe_secret_key.is_empty() {
            return Err(StripeError::NotConfigured);
        }
        Ok(Self {
            http: reqwest::Client::new(),
            secret_key: config.stripe_secret_key.clone(),
            base_url: "https://api.stripe.com".into(),
        })
    }

    /// Creates a payment-mode checkout session for one seat of `price_id`,
    /// tagging it with the purchasing user so the webhook can resolve it.
    pub async fn create_checkout_session(
        &self,
        price_id: &str,
        user_id: i64,
        success_url: &str,
        cancel_url: &str,
    ) -> Result<CheckoutSession, StripeError> {
        let user_id = user_id.to_string();
        let params: Vec<(&str, &str)> = vec![
            ("mode", "payment"),
            ("line_items[0][price]", price_id),
            ("line_items[0][quantity]", "1"),
            ("success_url", success_url),
            ("cancel_url", cancel_url),
            ("metadata[user_id]", &user_id),
            ("metadata[price_id]", price_id),
        ];

        let response = self
            .http
            .post(format!("{}/v1/checkout/sessions", self.base_url))
            .basic_auth(&self.secret_key, None::<&str>)
            .form(&params)
            .send()
            .await?;

        Self::into_session(response).await
    }

    pub async fn retrieve_checkout_session(
        &self,
        session_id: &str,
    ) -> Result<CheckoutSession, StripeError> {
        let response = self
            .http
            .get(format!(
                "{}/v1/checkout/sessions/{}",
                self.base_url, session_id
            ))
            .basic_auth(&self.secret_key, None::<&str>)
            .send()
            .await?;

        Self::into_session(response).await
    }

    async fn into_session(response: reqwest::Response) -> Result<CheckoutSession, StripeError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StripeError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response.json().await?)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SignatureError {
    #[error("Malformed signature header")]
    Malformed,

    #[error("Signature timestamp outside tolerance")]
    Expired,

    #[error("Signature mismatch")]
    Mismatch,
}

/// Verifies a webhook signature header (`t=<unix>,v1=<hex hmac>`) against
/// the raw request body. The HMAC covers `"{t}.{body}"`; comparison is
/// constant-time via `Mac::verify_slice`.
pub fn verify_webhook_signature(
    payload: &[u8],
    signature_header: &str,
    secret: &str,
) -> Result<(), SignatureError> {
    let mut timestamp: Option<i64> = None;
    let mut signatures: Vec<&str> = Vec::new();

    for part in signature_header.split(',') {
        match part.trim().split_once('=') {
            Some(("t", value)) => timestamp = value.parse().ok(),
            Some(("v1", value)) => signatures.push(value),
            _ => {}
        }
    }

    let timestamp = timestamp.ok_or(SignatureError::Malformed)?;
    if signatures.is_empty() {
        return Err(SignatureError::Malformed);
    }

    if (Utc::now().timestamp() - timestamp).abs() > WEBHOOK_TOLERANCE_SECS {
        return Err(SignatureError::Expired);
    }

    for signature in signatures {
        let Ok(expected) = hex::decode(signature) else {
            continue;
        };
        let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC key");
        mac.update(format!("{}.", timestamp).as_bytes());
        mac.update(payload);
        if mac.verify_slice(&expected).is_ok() {
            return Ok(());
        }
    }

    Err(SignatureError::Mismatch)
}
