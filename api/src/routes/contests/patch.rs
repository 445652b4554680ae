use crate::auth::AuthUser;
use crate::response::ApiResponse;
use crate::routes::common::{
    ContestResponse, Reply, db_error, error_reply, format_validation_errors, load_caller,
    load_contest,
};
use crate::state::AppState;
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use db::models::contest::{ContestChanges, ContestStatus, Model as ContestModel};
use sea_orm::DbErr;
use serde::Deserialize;
use validator::Validate;

/// Editable contest fields. Anything else in the body (status, counters, winner)
/// is ignored.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateContestRequest {
    #[validate(length(min = 1, message = "Name cannot be empty"))]
    pub name: Option<String>,

    #[validate(url(message = "Image must be a valid URL"))]
    pub image: Option<String>,

    #[validate(length(min = 1, message = "Description cannot be empty"))]
    pub description: Option<String>,

    #[validate(range(min = 0.0, message = "Price cannot be negative"))]
    pub price: Option<f64>,

    #[validate(range(min = 0.0, message = "Prize money cannot be negative"))]
    pub prize_money: Option<f64>,

    #[validate(length(min = 1, message = "Task instruction cannot be empty"))]
    pub task_instruction: Option<String>,

    #[validate(length(min = 1, message = "Category cannot be empty"))]
    pub category: Option<String>,

    pub deadline: Option<DateTime<Utc>>,
}

fn trim_field(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string())
}

impl UpdateContestRequest {
    /// Strips surrounding whitespace so blank text fails the length checks.
    fn trimmed(self) -> Self {
        Self {
            name: trim_field(self.name),
            description: trim_field(self.description),
            task_instruction: trim_field(self.task_instruction),
            category: trim_field(self.category),
            ..self
        }
    }
}

impl From<UpdateContestRequest> for ContestChanges {
    fn from(req: UpdateContestRequest) -> Self {
        Self {
            name: req.name,
            image: req.image,
            description: req.description,
            price: req.price,
            prize_money: req.prize_money,
            task_instruction: req.task_instruction,
            category: req.category,
            deadline: req.deadline,
        }
    }
}

/// PATCH /api/contests/{id}
///
/// Partial update of a contest's editable fields.
///
/// Creators may edit only their own contests, and only while they are pending.
/// Admins may edit any contest in any state.
///
/// ### Responses
/// - `200 OK` with the updated contest
/// - `400 Bad Request` on validation failure or when the contest is no longer pending
/// - `403 Forbidden` "You can only modify your own contests"
/// - `404 Not Found` "Contest not found"
pub async fn update_contest(
    State(app_state): State<AppState>,
    Path(id): Path<i64>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    Json(req): Json<UpdateContestRequest>,
) -> Reply<ContestResponse> {
    let req = req.trimmed();
    if let Err(e) = req.validate() {
        return error_reply(StatusCode::BAD_REQUEST, format_validation_errors(&e));
    }

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
            return error_reply(StatusCode::FORBIDDEN, "You can only modify your own contests");
        }
        if contest.status != ContestStatus::Pending {
            return error_reply(StatusCode::BAD_REQUEST, "Only pending contests can be edited");
        }
    }

    match ContestModel::update_details(db, id, req.into()).await {
        Ok(updated) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                ContestResponse::from(updated),
                "Contest updated successfully",
            )),
        ),
        Err(DbErr::RecordNotFound(_)) => error_reply(StatusCode::NOT_FOUND, "Contest not found"),
        Err(e) => db_error(e),
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: ContestStatus,
}

/// PATCH /api/contests/{id}/status
///
/// Admin review: approve (`accepted`), reject (`rejected`) or otherwise set the status.
/// A `completed` contest already has its winner and keeps that status.
///
/// ### Request Body
/// ```json
/// { "status": "accepted" }
/// ```
///
/// ### Responses
/// - `200 OK` with the updated contest
/// - `400 Bad Request` "Completed contests cannot change status"
/// - `404 Not Found` "Contest not found"
pub async fn update_status(
    State(app_state): State<AppState>,
    Path(id): Path<i64>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    Json(req): Json<UpdateStatusRequest>,
) -> Reply<ContestResponse> {
    let db = app_state.db();
    let contest = match load_contest(db, id).await {
        Ok(contest) => contest,
        Err(reply) => return reply,
    };

    if contest.status == ContestStatus::Completed && req.status != ContestStatus::Completed {
        return error_reply(
            StatusCode::BAD_REQUEST,
            "Completed contests cannot change status",
        );
    }

    match ContestModel::set_status(db, id, req.status).await {
        Ok(contest) => {
            tracing::info!(contest_id = id, status = %contest.status, admin = claims.sub, "contest status changed");
            (
                StatusCode::OK,
                Json(ApiResponse::success(
                    ContestResponse::from(contest),
                    "Contest status updated successfully",
                )),
            )
        }
        Err(DbErr::RecordNotFound(_)) => error_reply(StatusCode::NOT_FOUND, "Contest not found"),
        Err(e) => db_error(e),
    }
}
