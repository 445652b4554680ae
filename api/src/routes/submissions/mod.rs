//! Task submission and review.
//!
//! - `PATCH /participations/{id}/submit` → `submit_task` (participation owner)
//! - `GET /submissions/{contest_id}` → `contest_submissions` (contest owner or admin)

use crate::auth::guards::{allow_authenticated, allow_creator};
use crate::state::AppState;
use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{get, patch},
};
use get::contest_submissions;
use patch::submit_task;

pub mod get;
pub mod patch;

pub fn submissions_routes(app_state: AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/participations/{id}/submit",
            patch(submit_task).route_layer(from_fn_with_state(app_state.clone(), allow_authenticated)),
        )
        .route(
            "/submissions/{contest_id}",
            get(contest_submissions).route_layer(from_fn_with_state(app_state, allow_creator)),
        )
}
