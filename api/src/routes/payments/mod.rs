//! Payment and participation routes.
//!
//! - `POST /payments/checkout` → `create_checkout` (authenticated)
//! - `POST /payments/verify` → `verify_payment` (authenticated)
//! - `GET /me/participations` → `my_participations` (authenticated)
//! - `GET /my-participations/{email}` → `participations_by_email` (authenticated)

use crate::auth::guards::allow_authenticated;
use crate::state::AppState;
use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{get, post},
};
use get::{my_participations, participations_by_email};
use post::{create_checkout, verify_payment};

pub mod get;
pub mod post;

pub fn payments_routes(app_state: AppState) -> Router<AppState> {
    Router::new()
        .route("/payments/checkout", post(create_checkout))
        .route("/payments/verify", post(verify_payment))
        .route("/me/participations", get(my_participations))
        .route("/my-participations/{email}", get(participations_by_email))
        .route_layer(from_fn_with_state(app_state, allow_authenticated))
}
