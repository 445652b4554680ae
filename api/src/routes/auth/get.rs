use crate::auth::AuthUser;
use crate::response::ApiResponse;
use crate::routes::common::{Reply, UserResponse, load_caller};
use crate::state::AppState;
use axum::{Extension, Json, extract::State, http::StatusCode};

/// GET /auth/me
///
/// Profile of the authenticated user.
///
/// ### Responses
/// - `200 OK` with the user profile
/// - `401 Unauthorized` when the token is missing, invalid, or its user no longer exists
pub async fn get_me(
    State(app_state): State<AppState>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
) -> Reply<UserResponse> {
    match load_caller(app_state.db(), &claims).await {
        Ok(user) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                UserResponse::from(user),
                "User data retrieved successfully",
            )),
        ),
        Err(reply) => reply,
    }
}
