use crate::auth::AuthUser;
use crate::response::ApiResponse;
use crate::routes::common::{Reply, UserResponse, db_error, error_reply};
use crate::state::AppState;
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use db::models::user::{Model as UserModel, Role};
use sea_orm::DbErr;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct UpdateRoleRequest {
    pub role: Role,
}

/// PATCH /api/users/{user_id}/role
///
/// Change a user's platform role. Admin only; admins cannot change their own role.
///
/// ### Request Body
/// ```json
/// { "role": "creator" }
/// ```
///
/// ### Responses
/// - `200 OK` with the updated user
/// - `403 Forbidden` "You cannot change your own role"
/// - `404 Not Found` "User not found"
/// - `500 Internal Server Error`
pub async fn update_role(
    State(app_state): State<AppState>,
    Path(user_id): Path<i64>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    Json(req): Json<UpdateRoleRequest>,
) -> Reply<UserResponse> {
    if user_id == claims.sub {
        return error_reply(StatusCode::FORBIDDEN, "You cannot change your own role");
    }

    match UserModel::set_role(app_state.db(), user_id, req.role).await {
        Ok(user) => {
            tracing::info!(user_id, role = %user.role, changed_by = claims.sub, "role updated");
            (
                StatusCode::OK,
                Json(ApiResponse::success(
                    UserResponse::from(user),
                    "User role updated successfully",
                )),
            )
        }
        Err(DbErr::RecordNotFound(_)) => error_reply(StatusCode::NOT_FOUND, "User not found"),
        Err(e) => db_error(e),
    }
}
