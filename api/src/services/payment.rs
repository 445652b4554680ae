//! Payment gateway abstraction used by the checkout and verification routes.
//!
//! Handlers only talk to [`PaymentGateway`]; the production implementation is
//! [`StripeGateway`](crate::services::stripe::StripeGateway).

use async_trait::async_trait;
use std::collections::HashMap;

/// Metadata keys attached to every checkout session.
pub const META_CONTEST_ID: &str = "contestId";
pub const META_CONTEST_NAME: &str = "contestName";
pub const META_COST: &str = "cost";

#[derive(Debug, thiserror::Error)]
pub enum PaymentError {
    #[error("payment provider is not configured")]
    NotConfigured,

    #[error("checkout session {0} not found")]
    SessionNotFound(String),

    #[error("payment provider returned {status}: {message}")]
    Provider { status: u16, message: String },

    #[error("payment provider request failed: {0}")]
    Http(#[from] reqwest::Error),
}

/// Everything needed to open a hosted checkout page for one contest entry.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckoutRequest {
    pub contest_id: i64,
    pub contest_name: String,
    /// Amount in minor units (cents).
    pub amount_minor: i64,
    pub currency: String,
    /// Human-readable cost, stored as metadata and read back on verification.
    pub cost: String,
    pub customer_email: String,
    pub success_url: String,
    pub cancel_url: String,
}

/// Provider-neutral view of a checkout session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CheckoutSession {
    pub id: String,
    pub url: Option<String>,
    pub paid: bool,
    pub payment_intent: Option<String>,
    pub customer_email: Option<String>,
    pub metadata: HashMap<String, String>,
}

impl CheckoutSession {
    /// Identifier used to deduplicate participations: the payment intent when the
    /// provider reports one, the session id otherwise.
    pub fn transaction_id(&self) -> &str {
        self.payment_intent.as_deref().unwrap_or(&self.id)
    }

    pub fn metadata_contest_id(&self) -> Option<i64> {
        self.metadata
            .get(META_CONTEST_ID)
            .and_then(|raw| raw.parse().ok())
    }

    pub fn metadata_cost(&self) -> Option<f64> {
        self.metadata.get(META_COST).and_then(|raw| raw.parse().ok())
    }
}

#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn create_checkout_session(
        &self,
        request: &CheckoutRequest,
    ) -> Result<CheckoutSession, PaymentError>;

    async fn retrieve_session(&self, session_id: &str) -> Result<CheckoutSession, PaymentError>;
}
