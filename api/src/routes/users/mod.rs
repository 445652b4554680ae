//! # Users Routes Module
//!
//! Routes for the `/api/users` endpoint group.
//!
//! - `POST /users` → `register_user` (public)
//! - `GET /users` → `list_users` (admin)
//! - `GET /users/role/{email}` → `get_role` (authenticated)
//! - `PATCH /users/{user_id}/role` → `update_role` (admin)
//! - `DELETE /users/{user_id}` → `delete_user` (admin)

use crate::auth::guards::{allow_admin, allow_authenticated};
use crate::state::AppState;
use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{delete, get, patch, post},
};
use delete::delete_user;
use get::{get_role, list_users};
use patch::update_role;
use post::register_user;

pub mod delete;
pub mod get;
pub mod patch;
pub mod post;

pub fn users_routes(app_state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", post(register_user))
        .route(
            "/",
            get(list_users).route_layer(from_fn_with_state(app_state.clone(), allow_admin)),
        )
        .route(
            "/role/{email}",
            get(get_role).route_layer(from_fn_with_state(app_state.clone(), allow_authenticated)),
        )
        .route(
            "/{user_id}/role",
            patch(update_role).route_layer(from_fn_with_state(app_state.clone(), allow_admin)),
        )
        .route(
            "/{user_id}",
            delete(delete_user).route_layer(from_fn_with_state(app_state, allow_admin)),
        )
}
