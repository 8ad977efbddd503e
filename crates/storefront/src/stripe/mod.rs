//! Payment API client (Stripe).
//!
//! One operation: create a payment intent for a checkout total and hand the
//! client secret back to the browser, which drives card entry and 3-D
//! Secure against the provider directly. Deliberately thin - no retries, no
//! idempotency keys, no webhook handling; a failed call is surfaced to the
//! customer to retry.
//!
//! The API base URL comes from configuration so tests can point the client
//! at a local mock.

use std::sync::Arc;

use reqwest::StatusCode;
use secrecy::ExposeSecret;
use serde::Deserialize;
use thiserror::Error;
use tracing::instrument;

use neon_pulse_core::OrderId;

use crate::config::StripeConfig;

/// Errors that can occur when talking to the payment API.
#[derive(Debug, Error)]
pub enum PaymentsError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The payment API rejected the request.
    #[error("payment API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Error message from the API.
        message: String,
    },

    /// Rate limited by the payment API.
    #[error("payment API rate limited")]
    RateLimited,

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The intent came back without a client secret.
    #[error("payment intent {0} has no client secret")]
    MissingClientSecret(String),
}

/// A created payment intent.
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentIntent {
    /// Intent ID (`pi_...`).
    pub id: String,
    /// Secret the browser uses to confirm the payment.
    pub client_secret: Option<String>,
    /// Amount in minor units, echoed back by the API.
    pub amount: i64,
    /// Lowercase currency code.
    pub currency: String,
}

/// Error envelope returned by the payment API.
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: Option<String>,
    #[serde(rename = "type")]
    error_type: Option<String>,
}

/// Client for the payment API.
#[derive(Clone)]
pub struct StripeClient {
    inner: Arc<StripeClientInner>,
}

struct StripeClientInner {
    client: reqwest::Client,
    api_base: String,
    api_version: String,
    secret_key: String,
}

impl StripeClient {
    /// Create a new payment API client.
    #[must_use]
    pub fn new(config: &StripeConfig) -> Self {
        Self {
            inner: Arc::new(StripeClientInner {
                client: reqwest::Client::new(),
                api_base: config.api_base.trim_end_matches('/').to_owned(),
                api_version: config.api_version.clone(),
                secret_key: config.secret_key.expose_secret().to_owned(),
            }),
        }
    }

    /// Create a payment intent.
    ///
    /// `amount_minor` is in the currency's minor unit (cents); the order ID
    /// rides along as metadata so the payment shows up next to the order in
    /// the provider dashboard.
    ///
    /// # Errors
    ///
    /// Returns [`PaymentsError`] if the request fails, the API rejects it,
    /// or the response carries no client secret.
    #[instrument(skip(self))]
    pub async fn create_payment_intent(
        &self,
        amount_minor: i64,
        currency: &str,
        order_id: OrderId,
    ) -> Result<PaymentIntent, PaymentsError> {
        let params = [
            ("amount", amount_minor.to_string()),
            ("currency", currency.to_owned()),
            ("metadata[orderId]", order_id.to_string()),
        ];

        let response = self
            .inner
            .client
            .post(format!("{}/v1/payment_intents", self.inner.api_base))
            .bearer_auth(&self.inner.secret_key)
            .header("Stripe-Version", &self.inner.api_version)
            .form(&params)
            .send()
            .await?;

        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(PaymentsError::RateLimited);
        }

        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ApiErrorBody>(&body).map_or_else(
                |_| body.chars().take(200).collect(),
                |e| {
                    e.error.message.unwrap_or_else(|| {
                        e.error.error_type.unwrap_or_else(|| "unknown".to_owned())
                    })
                },
            );
            tracing::error!(status = %status, message = %message, "payment intent creation failed");
            return Err(PaymentsError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let intent: PaymentIntent = serde_json::from_str(&body)?;

        if intent.client_secret.is_none() {
            return Err(PaymentsError::MissingClientSecret(intent.id));
        }

        Ok(intent)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_intent_parses_provider_response() {
        let body = r#"{
            "id": "pi_3Abc",
            "object": "payment_intent",
            "client_secret": "pi_3Abc_secret_xyz",
            "amount": 6300,
            "currency": "eur",
            "status": "requires_payment_method"
        }"#;

        let intent: PaymentIntent = serde_json::from_str(body).unwrap();
        assert_eq!(intent.id, "pi_3Abc");
        assert_eq!(intent.amount, 6300);
        assert_eq!(intent.client_secret.as_deref(), Some("pi_3Abc_secret_xyz"));
    }

    #[test]
    fn test_error_body_parses() {
        let body = r#"{"error":{"message":"Amount must be at least 50 cents","type":"invalid_request_error"}}"#;
        let err: ApiErrorBody = serde_json::from_str(body).unwrap();
        assert_eq!(
            err.error.message.as_deref(),
            Some("Amount must be at least 50 cents")
        );
    }

    #[test]
    fn test_error_display() {
        let err = PaymentsError::Api {
            status: 402,
            message: "card declined".to_owned(),
        };
        assert_eq!(err.to_string(), "payment API error (402): card declined");
    }
}
