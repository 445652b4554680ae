//! HTTP route entry point for `/` and `/api/...`.
//!
//! Routes are organized by domain, each protected by the access-control
//! middleware it needs:
//! - `/health` → Health check (public)
//! - `/auth` → Login and current-user profile
//! - `/users` → Registration (public) and user management (admin)
//! - `/contests` → Contest management (creators and admins), details (public)
//! - `/all-contests`, `/popular-contests`, `/stats`, `/admin-stats` → Listings and counters
//! - `/payments`, `/me/participations`, `/my-participations` → Checkout and participations
//! - `/participations/{id}/submit`, `/submissions` → Task submission and review
//! - `/participations/{id}/winner`, `/leaderboard` → Winners

use crate::routes::{
    auth::auth_routes, contests::contests_routes, explore::explore_routes,
    health::health_routes, payments::payments_routes, submissions::submissions_routes,
    users::users_routes, winners::winners_routes,
};
use crate::state::AppState;
use axum::{Router, routing::get};

pub mod auth;
pub mod common;
pub mod contests;
pub mod explore;
pub mod health;
pub mod payments;
pub mod submissions;
pub mod users;
pub mod winners;

/// Builds the complete `/api` router with the application state applied.
pub fn routes(app_state: AppState) -> Router {
    Router::new()
        .nest("/health", health_routes())
        .nest("/auth", auth_routes(app_state.clone()))
        .nest("/users", users_routes(app_state.clone()))
        .nest("/contests", contests_routes(app_state.clone()))
        .merge(explore_routes(app_state.clone()))
        .merge(payments_routes(app_state.clone()))
        .merge(submissions_routes(app_state.clone()))
        .merge(winners_routes(app_state.clone()))
        .with_state(app_state)
}

/// The whole application: the plain-text banner at `/` plus [`routes`] under `/api`.
pub fn app(app_state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .nest("/api", routes(app_state))
}

/// GET /
///
/// Plain-text banner confirming the server is up.
pub async fn root() -> &'static str {
    "ContestHub Server is Running"
}
