//! Application state container shared across Axum route handlers.

use crate::services::payment::PaymentGateway;
use sea_orm::DatabaseConnection;
use std::sync::Arc;

/// Central application state shared across the server.
///
/// This includes:
/// - A cloned, thread-safe database connection for use with SeaORM.
/// - The payment gateway used for checkout sessions and payment verification.
#[derive(Clone)]
pub struct AppState {
    db: DatabaseConnection,
    payments: Arc<dyn PaymentGateway>,
}

impl AppState {
    /// Creates a new `AppState` from a database connection and a payment gateway.
    pub fn new(db: DatabaseConnection, payments: Arc<dyn PaymentGateway>) -> Self {
        Self { db, payments }
    }

    /// Returns a shared reference to the internal `DatabaseConnection`.
    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    pub fn payments(&self) -> &dyn PaymentGateway {
        self.payments.as_ref()
    }
}
