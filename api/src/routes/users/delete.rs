use crate::auth::AuthUser;
use crate::response::ApiResponse;
use crate::routes::common::{Reply, db_error, error_reply};
use crate::state::AppState;
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use db::models::user::Model as UserModel;

/// DELETE /api/users/{user_id}
///
/// Delete a user by ID. Admin only. Admins cannot delete their own account.
///
/// ### Responses
/// - `200 OK` "User deleted successfully"
/// - `403 Forbidden` "You cannot delete your own account"
/// - `404 Not Found` "User not found"
/// - `500 Internal Server Error`
pub async fn delete_user(
    State(app_state): State<AppState>,
    Path(user_id): Path<i64>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
) -> Reply<()> {
    if user_id == claims.sub {
        return error_reply(StatusCode::FORBIDDEN, "You cannot delete your own account");
    }

    match UserModel::delete(app_state.db(), user_id).await {
        Ok(0) => error_reply(StatusCode::NOT_FOUND, "User not found"),
        Ok(_) => {
            tracing::info!(user_id, deleted_by = claims.sub, "user deleted");
            (
                StatusCode::OK,
                Json(ApiResponse::success_without_data("User deleted successfully")),
            )
        }
        Err(e) => db_error(e),
    }
}
