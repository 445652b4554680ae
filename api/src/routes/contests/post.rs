use crate::auth::AuthUser;
use crate::response::ApiResponse;
use crate::routes::common::{
    ContestResponse, Reply, db_error, error_reply, format_validation_errors, load_caller,
};
use crate::state::AppState;
use axum::{Extension, Json, extract::State, http::StatusCode};
use chrono::{DateTime, Utc};
use db::models::contest::{Model as ContestModel, NewContest};
use serde::Deserialize;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateContestRequest {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,

    #[validate(url(message = "Image must be a valid URL"))]
    pub image: Option<String>,

    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,

    #[validate(range(min = 0.0, message = "Price cannot be negative"))]
    pub price: f64,

    #[validate(range(min = 0.0, message = "Prize money cannot be negative"))]
    pub prize_money: f64,

    #[validate(length(min = 1, message = "Task instruction is required"))]
    pub task_instruction: String,

    #[validate(length(min = 1, message = "Category is required"))]
    pub category: String,

    pub deadline: DateTime<Utc>,
}

impl CreateContestRequest {
    /// Strips surrounding whitespace so blank text fails the length checks.
    fn trimmed(self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            description: self.description.trim().to_string(),
            task_instruction: self.task_instruction.trim().to_string(),
            category: self.category.trim().to_string(),
            ..self
        }
    }
}

/// POST /api/contests
///
/// Submit a new contest for review. The creator is the authenticated user and the
/// contest starts `pending` with no participants.
///
/// ### Request Body
/// ```json
/// {
///   "name": "Logo Sprint",
///   "image": "https://img.example/logo.png",
///   "description": "Design a logo",
///   "price": 10.0,
///   "prize_money": 250.0,
///   "task_instruction": "Submit a link to your design",
///   "category": "Design",
///   "deadline": "2026-12-31T23:59:59Z"
/// }
/// ```
///
/// ### Responses
/// - `201 Created` with the contest
/// - `400 Bad Request` on validation failure
/// - `401 Unauthorized` / `403 Forbidden` from the creator guard
pub async fn create_contest(
    State(app_state): State<AppState>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    Json(req): Json<CreateContestRequest>,
) -> Reply<ContestResponse> {
    let req = req.trimmed();
    if let Err(e) = req.validate() {
        return error_reply(StatusCode::BAD_REQUEST, format_validation_errors(&e));
    }

    let db = app_state.db();
    let creator = match load_caller(db, &claims).await {
        Ok(user) => user,
        Err(reply) => return reply,
    };

    let new = NewContest {
        name: req.name,
        image: req.image,
        description: req.description,
        price: req.price,
        prize_money: req.prize_money,
        task_instruction: req.task_instruction,
        category: req.category,
        deadline: req.deadline,
        creator_email: creator.email,
        creator_name: creator.name,
    };

    match ContestModel::create(db, new).await {
        Ok(contest) => {
            tracing::info!(contest_id = contest.id, creator = %contest.creator_email, "contest created");
            (
                StatusCode::CREATED,
                Json(ApiResponse::success(
                    ContestResponse::from(contest),
                    "Contest created successfully",
                )),
            )
        }
        Err(e) => db_error(e),
    }
}
