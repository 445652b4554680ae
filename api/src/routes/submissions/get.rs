use crate::auth::AuthUser;
use crate::response::ApiResponse;
use crate::routes::common::{
    ParticipationResponse, Reply, db_error, error_reply, load_caller, load_contest,
};
use crate::state::AppState;
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use db::models::participation::Model as ParticipationModel;

/// GET /api/submissions/{contest_id}
///
/// Submitted entries of a contest, for its creator or an admin to review.
///
/// ### Responses
/// - `200 OK` with participations that carry a task link
/// - `403 Forbidden` when the caller neither owns the contest nor is an admin
/// - `404 Not Found` "Contest not found"
pub async fn contest_submissions(
    State(app_state): State<AppState>,
    Path(contest_id): Path<i64>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
) -> Reply<Vec<ParticipationResponse>> {
    let db = app_state.db();
    let contest = match load_contest(db, contest_id).await {
        Ok(contest) => contest,
        Err(reply) => return reply,
    };

    if !claims.is_admin() {
        let caller = match load_caller(db, &claims).await {
            Ok(user) => user,
            Err(reply) => return reply,
        };
        if !contest.is_owned_by(&caller.email) {
            return error_reply(
                StatusCode::FORBIDDEN,
                "You can only review submissions of your own contests",
            );
        }
    }

    match ParticipationModel::submissions_for_contest(db, contest_id).await {
        Ok(rows) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                rows.into_iter().map(ParticipationResponse::from).collect(),
                "Submissions retrieved successfully",
            )),
        ),
        Err(e) => db_error(e),
    }
}
