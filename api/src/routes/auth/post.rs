use crate::response::ApiResponse;
use crate::routes::common::{AuthResponse, Reply, db_error, error_reply, format_validation_errors};
use crate::state::AppState;
use axum::{Json, extract::State, http::StatusCode};
use db::models::user::Model as UserModel;
use serde::Deserialize;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// POST /auth/login
///
/// Authenticate with email and password and receive a JWT.
///
/// ### Request Body
/// ```json
/// { "email": "user@example.com", "password": "secret123" }
/// ```
///
/// ### Responses
/// - `200 OK` with `{ id, name, email, photo_url, role, token, expires_at }`
/// - `400 Bad Request` on validation failure
/// - `401 Unauthorized` "Invalid email or password"
/// - `500 Internal Server Error`
pub async fn login(
    State(app_state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Reply<AuthResponse> {
    if let Err(e) = req.validate() {
        return error_reply(StatusCode::BAD_REQUEST, format_validation_errors(&e));
    }

    let user = match UserModel::verify_credentials(app_state.db(), &req.email, &req.password).await
    {
        Ok(Some(user)) => user,
        Ok(None) => {
            tracing::info!(email = %req.email, "failed login attempt");
            return error_reply(StatusCode::UNAUTHORIZED, "Invalid email or password");
        }
        Err(e) => return db_error(e),
    };

    match AuthResponse::issue(user) {
        Ok(body) => (
            StatusCode::OK,
            Json(ApiResponse::success(body, "Login successful")),
        ),
        Err(e) => {
            tracing::error!(error = %e, "failed to sign token");
            error_reply(StatusCode::INTERNAL_SERVER_ERROR, "Failed to issue token")
        }
    }
}
