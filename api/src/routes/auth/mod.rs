//! Authentication routes under `/api/auth`.
//!
//! - `POST /auth/login` → `login` (public)
//! - `GET /auth/me` → `get_me` (authenticated)

use crate::auth::guards::allow_authenticated;
use crate::state::AppState;
use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{get, post},
};
use get::get_me;
use post::login;

pub mod get;
pub mod post;

pub fn auth_routes(app_state: AppState) -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route(
            "/me",
            get(get_me).route_layer(from_fn_with_state(app_state, allow_authenticated)),
        )
}
