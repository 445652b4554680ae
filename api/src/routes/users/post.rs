use crate::response::ApiResponse;
use crate::routes::common::{AuthResponse, Reply, db_error, error_reply, format_validation_errors};
use crate::state::AppState;
use axum::{Json, extract::State, http::StatusCode};
use db::models::user::{Model as UserModel, Role};
use sea_orm::SqlErr;
use serde::Deserialize;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,

    #[validate(url(message = "Photo URL must be a valid URL"))]
    pub photo_url: Option<String>,

    pub role: Option<Role>,
}

/// POST /users
///
/// Public registration. New accounts start with zero wins.
///
/// ### Request Body
/// ```json
/// {
///   "name": "Ada",
///   "email": "ada@example.com",
///   "password": "secret123",
///   "photo_url": "https://img.example/ada.png",
///   "role": "creator"
/// }
/// ```
///
/// `role` is optional and may only be `user` (default) or `creator`.
///
/// ### Responses
/// - `201 Created` with the user and a token
/// - `400 Bad Request` on validation failure or a disallowed role
/// - `409 Conflict` "User already exists"
/// - `500 Internal Server Error`
pub async fn register_user(
    State(app_state): State<AppState>,
    Json(mut req): Json<RegisterRequest>,
) -> Reply<AuthResponse> {
    req.name = req.name.trim().to_string();
    if let Err(e) = req.validate() {
        return error_reply(StatusCode::BAD_REQUEST, format_validation_errors(&e));
    }

    let role = req.role.unwrap_or_default();
    if role == Role::Admin {
        return error_reply(StatusCode::BAD_REQUEST, "Role must be either user or creator");
    }

    let db = app_state.db();

    match UserModel::find_by_email(db, &req.email).await {
        Ok(Some(_)) => return error_reply(StatusCode::CONFLICT, "User already exists"),
        Ok(None) => {}
        Err(e) => return db_error(e),
    }

    let user = match UserModel::create(
        db,
        &req.name,
        &req.email,
        &req.password,
        req.photo_url.as_deref(),
        role,
    )
    .await
    {
        Ok(user) => user,
        Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
            return error_reply(StatusCode::CONFLICT, "User already exists");
        }
        Err(e) => return db_error(e),
    };

    tracing::info!(user_id = user.id, role = %user.role, "user registered");

    match AuthResponse::issue(user) {
        Ok(body) => (
            StatusCode::CREATED,
            Json(ApiResponse::success(body, "User registered successfully")),
        ),
        Err(e) => {
            tracing::error!(error = %e, "failed to sign token");
            error_reply(StatusCode::INTERNAL_SERVER_ERROR, "Failed to issue token")
        }
    }
}
