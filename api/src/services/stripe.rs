//! Stripe Checkout client.
//!
//! Talks to the Stripe REST API directly: form-encoded requests, bearer
//! authentication with `STRIPE_SECRET_KEY`, JSON responses.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use std::collections::HashMap;
use tracing::{debug, warn};

use crate::services::payment::{
    CheckoutRequest, CheckoutSession, META_CONTEST_ID, META_CONTEST_NAME, META_COST,
    PaymentError, PaymentGateway,
};

pub struct StripeGateway {
    client: reqwest::Client,
    api_base: String,
    secret_key: String,
}

#[derive(Debug, Deserialize)]
struct StripeSession {
    id: String,
    url: Option<String>,
    payment_status: Option<String>,
    payment_intent: Option<String>,
    customer_email: Option<String>,
    customer_details: Option<StripeCustomerDetails>,
    #[serde(default)]
    metadata: HashMap<String, String>,
}

#[derive(Debug, Deserialize)]
struct StripeCustomerDetails {
    email: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StripeErrorBody {
    error: StripeErrorDetail,
}

#[derive(Debug, Deserialize)]
struct StripeErrorDetail {
    message: Option<String>,
}

impl From<StripeSession> for CheckoutSession {
    fn from(session: StripeSession) -> Self {
        let customer_email = session
            .customer_details
            .and_then(|details| details.email)
            .or(session.customer_email);

        Self {
            id: session.id,
            url: session.url,
            paid: session.payment_status.as_deref() == Some("paid"),
            payment_intent: session.payment_intent,
            customer_email,
            metadata: session.metadata,
        }
    }
}

impl StripeGateway {
    pub fn new(api_base: impl Into<String>, secret_key: impl Into<String>) -> Self {
        let api_base = api_base.into().trim_end_matches('/').to_string();
        Self {
            client: reqwest::Client::new(),
            api_base,
            secret_key: secret_key.into(),
        }
    }

    fn ensure_configured(&self) -> Result<(), PaymentError> {
        if self.secret_key.is_empty() {
            warn!("STRIPE_SECRET_KEY is not set; refusing payment request");
            return Err(PaymentError::NotConfigured);
        }
        Ok(())
    }

    async fn parse_session(response: reqwest::Response) -> Result<CheckoutSession, PaymentError> {
        let status = response.status();
        if status.is_success() {
            let session: StripeSession = response.json().await?;
            return Ok(session.into());
        }

        let message = response
            .json::<StripeErrorBody>()
            .await
            .ok()
            .and_then(|body| body.error.message)
            .unwrap_or_else(|| status.to_string());

        Err(PaymentError::Provider {
            status: status.as_u16(),
            message,
        })
    }
}

/// Checkout session ids are opaque tokens like `cs_test_a1B2`. Anything else is
/// refused before it can reach the URL path.
fn is_session_id(id: &str) -> bool {
    id.starts_with("cs_") && id.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_')
}

/// Stripe's bracketed form encoding for a one-item card checkout.
fn checkout_form(request: &CheckoutRequest) -> Vec<(String, String)> {
    vec![
        ("mode".into(), "payment".into()),
        ("payment_method_types[0]".into(), "card".into()),
        (
            "line_items[0][price_data][currency]".into(),
            request.currency.clone(),
        ),
        (
            "line_items[0][price_data][product_data][name]".into(),
            request.contest_name.clone(),
        ),
        (
            "line_items[0][price_data][unit_amount]".into(),
            request.amount_minor.to_string(),
        ),
        ("line_items[0][quantity]".into(), "1".into()),
        ("success_url".into(), request.success_url.clone()),
        ("cancel_url".into(), request.cancel_url.clone()),
        ("customer_email".into(), request.customer_email.clone()),
        (
            format!("metadata[{META_CONTEST_ID}]"),
            request.contest_id.to_string(),
        ),
        (
            format!("metadata[{META_CONTEST_NAME}]"),
            request.contest_name.clone(),
        ),
        (format!("metadata[{META_COST}]"), request.cost.clone()),
    ]
}

#[async_trait]
impl PaymentGateway for StripeGateway {
    async fn create_checkout_session(
        &self,
        request: &CheckoutRequest,
    ) -> Result<CheckoutSession, PaymentError> {
        self.ensure_configured()?;
        debug!(contest_id = request.contest_id, amount = request.amount_minor, "creating checkout session");

        let response = self
            .client
            .post(format!("{}/v1/checkout/sessions", self.api_base))
            .bearer_auth(&self.secret_key)
            .form(&checkout_form(request))
            .send()
            .await?;

        Self::parse_session(response).await
    }

    async fn retrieve_session(&self, session_id: &str) -> Result<CheckoutSession, PaymentError> {
        self.ensure_configured()?;
        if !is_session_id(session_id) {
            warn!(session_id, "rejecting malformed checkout session id");
            return Err(PaymentError::SessionNotFound(session_id.to_string()));
        }

        let response = self
            .client
            .get(format!("{}/v1/checkout/sessions/{}", self.api_base, session_id))
            .bearer_auth(&self.secret_key)
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(PaymentError::SessionNotFound(session_id.to_string()));
        }

        Self::parse_session(response).await
    }
}
