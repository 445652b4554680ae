use crate::auth::AuthUser;
use crate::response::ApiResponse;
use crate::routes::common::{Reply, db_error, error_reply, load_caller, load_contest};
use crate::state::AppState;
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use db::models::contest::{ContestStatus, Model as ContestModel};

/// DELETE /api/contests/{id}
///
/// Deletes a contest together with its participations.
///
/// Creators may delete their own contests while pending or rejected. Accepted and
/// completed contests can only be removed by an admin.
///
/// ### Responses
/// - `200 OK` "Contest deleted successfully"
/// - `400 Bad Request` "Only Admin can delete an accepted or completed contest."
/// - `403 Forbidden` "You can only delete your own contests"
/// - `404 Not Found` "Contest not found"
pub async fn delete_contest(
    State(app_state): State<AppState>,
    Path(id): Path<i64>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
) -> Reply<()> {
    let db = app_state.db();
    let contest = match load_contest(db, id).await {
        Ok(contest) => contest,
        Err(reply) => return reply,
    };

    if !claims.is_admin() {
        let caller = match load_caller(db, &claims).await {
            Ok(user) => user,
            Err(reply) => return reply,
        };
        if !contest.is_owned_by(&caller.email) {
            return error_reply(StatusCode::FORBIDDEN, "You can only delete your own contests");
        }
        if matches!(
            contest.status,
            ContestStatus::Accepted | ContestStatus::Completed
        ) {
            return error_reply(
                StatusCode::BAD_REQUEST,
                "Only Admin can delete an accepted or completed contest.",
            );
        }
    }

    match ContestModel::delete(db, id).await {
        Ok(0) => error_reply(StatusCode::NOT_FOUND, "Contest not found"),
        Ok(_) => {
            tracing::info!(contest_id = id, deleted_by = claims.sub, "contest deleted");
            (
                StatusCode::OK,
                Json(ApiResponse::success_without_data("Contest deleted successfully")),
            )
        }
        Err(e) => db_error(e),
    }
}
