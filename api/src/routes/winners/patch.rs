use crate::auth::AuthUser;
use crate::response::ApiResponse;
use crate::routes::common::{
    ContestResponse, Reply, db_error, error_reply, load_caller, load_contest,
};
use crate::state::AppState;
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use db::models::{
    contest::{Model as ContestModel, WinnerOutcome},
    participation::Model as ParticipationModel,
    user::Model as UserModel,
};

/// PATCH /api/participations/{id}/winner
///
/// Declares the owner of a submitted participation the winner of its contest.
/// The contest becomes `completed` and the winner's win count goes up by one,
/// in a single transaction. Winner name and photo come from the winner's account;
/// without an account the email stands in for the name.
///
/// ### Responses
/// - `200 OK` with the completed contest
/// - `400 Bad Request` "Participation has no submitted task" / "Winner already declared!"
/// - `403 Forbidden` when the caller neither owns the contest nor is an admin
/// - `404 Not Found` for an unknown participation or contest
pub async fn declare_winner(
    State(app_state): State<AppState>,
    Path(id): Path<i64>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
) -> Reply<ContestResponse> {
    let db = app_state.db();

    let participation = match ParticipationModel::find(db, id).await {
        Ok(Some(p)) => p,
        Ok(None) => return error_reply(StatusCode::NOT_FOUND, "Participation record not found"),
        Err(e) => return db_error(e),
    };

    let contest = match load_contest(db, participation.contest_id).await {
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
                "You can only declare winners for your own contests",
            );
        }
    }

    if !participation.has_submission() {
        return error_reply(StatusCode::BAD_REQUEST, "Participation has no submitted task");
    }

    let winner = match UserModel::find_by_email(db, &participation.user_email).await {
        Ok(user) => user,
        Err(e) => return db_error(e),
    };
    let (winner_name, winner_photo) = match &winner {
        Some(user) => (user.name.as_str(), user.photo_url.as_deref()),
        None => (participation.user_email.as_str(), None),
    };

    match ContestModel::declare_winner(
        db,
        contest.id,
        &participation.user_email,
        winner_name,
        winner_photo,
    )
    .await
    {
        Ok(WinnerOutcome::Declared(updated)) => {
            tracing::info!(contest_id = updated.id, participation_id = id, "winner declared");
            (
                StatusCode::OK,
                Json(ApiResponse::success(
                    ContestResponse::from(updated),
                    "Winner declared successfully",
                )),
            )
        }
        Ok(WinnerOutcome::AlreadyDeclared) => {
            error_reply(StatusCode::BAD_REQUEST, "Winner already declared!")
        }
        Ok(WinnerOutcome::ContestNotFound) => {
            error_reply(StatusCode::NOT_FOUND, "Contest not found")
        }
        Err(e) => db_error(e),
    }
}
