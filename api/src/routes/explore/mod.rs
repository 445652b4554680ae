//! Public listings and platform statistics.
//!
//! - `GET /all-contests` → `all_contests` (public)
//! - `GET /popular-contests` → `popular_contests` (public)
//! - `GET /stats` → `public_stats` (public)
//! - `GET /admin-stats` → `admin_stats` (admin)

use crate::auth::guards::allow_admin;
use crate::state::AppState;
use axum::{Router, middleware::from_fn_with_state, routing::get};
use get::{admin_stats, all_contests, popular_contests, public_stats};

pub mod get;

pub fn explore_routes(app_state: AppState) -> Router<AppState> {
    Router::new()
        .route("/all-contests", get(all_contests))
        .route("/popular-contests", get(popular_contests))
        .route("/stats", get(public_stats))
        .route(
            "/admin-stats",
            get(admin_stats).route_layer(from_fn_with_state(app_state, allow_admin)),
        )
}
