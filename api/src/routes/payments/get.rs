use crate::auth::AuthUser;
use crate::response::ApiResponse;
use crate::routes::common::{ParticipationResponse, Reply, db_error, error_reply, load_caller};
use crate::state::AppState;
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use db::models::{participation::Model as ParticipationModel, user::normalize_email};
use sea_orm::DatabaseConnection;

async fn participations_of(
    db: &DatabaseConnection,
    email: &str,
) -> Reply<Vec<ParticipationResponse>> {
    match ParticipationModel::find_for_user(db, email).await {
        Ok(rows) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                rows.into_iter().map(ParticipationResponse::from).collect(),
                "Participations retrieved successfully",
            )),
        ),
        Err(e) => db_error(e),
    }
}

/// GET /api/me/participations
///
/// The caller's participations, most recent payment first.
pub async fn my_participations(
    State(app_state): State<AppState>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
) -> Reply<Vec<ParticipationResponse>> {
    let db = app_state.db();
    match load_caller(db, &claims).await {
        Ok(caller) => participations_of(db, &caller.email).await,
        Err(reply) => reply,
    }
}

/// GET /api/my-participations/{email}
///
/// Participations of the given email, matched case-insensitively. Non-admins
/// may only ask for their own.
///
/// ### Responses
/// - `200 OK` with the participations
/// - `403 Forbidden` "You can only view your own participations"
pub async fn participations_by_email(
    State(app_state): State<AppState>,
    Path(email): Path<String>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
) -> Reply<Vec<ParticipationResponse>> {
    let db = app_state.db();

    if !claims.is_admin() {
        let caller = match load_caller(db, &claims).await {
            Ok(user) => user,
            Err(reply) => return reply,
        };
        if caller.email != normalize_email(&email) {
            return error_reply(
                StatusCode::FORBIDDEN,
                "You can only view your own participations",
            );
        }
    }

    participations_of(db, &email).await
}
