//! Contest management routes under `/api/contests`.
//!
//! - `GET /contests` → `list_contests` (creator or admin)
//! - `POST /contests` → `create_contest` (creator or admin)
//! - `GET /contests/{id}` → `get_contest` (public)
//! - `PATCH /contests/{id}` → `update_contest` (owner or admin)
//! - `DELETE /contests/{id}` → `delete_contest` (owner or admin)
//! - `PATCH /contests/{id}/status` → `update_status` (admin)

use crate::auth::guards::{allow_admin, allow_creator};
use crate::state::AppState;
use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{delete, get, patch, post},
};
use delete::delete_contest;
use get::{get_contest, list_contests};
use patch::{update_contest, update_status};
use post::create_contest;

pub mod delete;
pub mod get;
pub mod patch;
pub mod post;

pub fn contests_routes(app_state: AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(list_contests)
                .post(create_contest)
                .route_layer(from_fn_with_state(app_state.clone(), allow_creator)),
        )
        .route("/{id}", get(get_contest))
        .route(
            "/{id}",
            patch(update_contest)
                .delete(delete_contest)
                .route_layer(from_fn_with_state(app_state.clone(), allow_creator)),
        )
        .route(
            "/{id}/status",
            patch(update_status).route_layer(from_fn_with_state(app_state, allow_admin)),
        )
}
