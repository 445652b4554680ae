//! Winner declaration and the public leaderboard.
//!
//! - `PATCH /participations/{id}/winner` → `declare_winner` (contest owner or admin)
//! - `GET /leaderboard` → `leaderboard` (public)

use crate::auth::guards::allow_creator;
use crate::state::AppState;
use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{get, patch},
};
use get::leaderboard;
use patch::declare_winner;

pub mod get;
pub mod patch;

pub fn winners_routes(app_state: AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/participations/{id}/winner",
            patch(declare_winner).route_layer(from_fn_with_state(app_state, allow_creator)),
        )
        .route("/leaderboard", get(leaderboard))
}
