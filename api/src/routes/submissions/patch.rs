use crate::auth::AuthUser;
use crate::response::ApiResponse;
use crate::routes::common::{
    ParticipationResponse, Reply, db_error, error_reply, format_validation_errors, load_caller,
};
use crate::state::AppState;
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::Utc;
use db::models::participation::Model as ParticipationModel;
use serde::Deserialize;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct SubmitTaskRequest {
    #[validate(url(message = "Task link must be a valid URL"))]
    pub task_link: String,
}

/// PATCH /api/participations/{id}/submit
///
/// Attach (or replace) the task link of the caller's participation.
///
/// ### Request Body
/// ```json
/// { "task_link": "https://drive.example/my-entry" }
/// ```
///
/// ### Responses
/// - `200 OK` with the updated participation
/// - `400 Bad Request` on an invalid link or when the deadline has passed
/// - `403 Forbidden` when the participation belongs to someone else
/// - `404 Not Found` "Participation record not found"
pub async fn submit_task(
    State(app_state): State<AppState>,
    Path(id): Path<i64>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    Json(req): Json<SubmitTaskRequest>,
) -> Reply<ParticipationResponse> {
    if let Err(e) = req.validate() {
        return error_reply(StatusCode::BAD_REQUEST, format_validation_errors(&e));
    }

    let db = app_state.db();
    let participation = match ParticipationModel::find(db, id).await {
        Ok(Some(p)) => p,
        Ok(None) => return error_reply(StatusCode::NOT_FOUND, "Participation record not found"),
        Err(e) => return db_error(e),
    };

    let caller = match load_caller(db, &claims).await {
        Ok(user) => user,
        Err(reply) => return reply,
    };
    if participation.user_email != caller.email {
        return error_reply(
            StatusCode::FORBIDDEN,
            "You can only submit tasks for your own participation",
        );
    }

    if participation.deadline.is_some_and(|d| d <= Utc::now()) {
        return error_reply(StatusCode::BAD_REQUEST, "Contest deadline has passed");
    }

    match ParticipationModel::submit_task(db, id, req.task_link.trim()).await {
        Ok(updated) => {
            tracing::info!(participation_id = id, contest_id = updated.contest_id, "task submitted");
            (
                StatusCode::OK,
                Json(ApiResponse::success(
                    ParticipationResponse::from(updated),
                    "Task submitted successfully",
                )),
            )
        }
        Err(e) => db_error(e),
    }
}
