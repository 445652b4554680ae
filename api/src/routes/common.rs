//! Response DTOs and helpers shared by several route groups.

use crate::auth::claims::Claims;
use crate::auth::generate_jwt;
use crate::response::ApiResponse;
use axum::{Json, http::StatusCode};
use db::models::{
    contest::{ContestStatus, Model as ContestModel},
    participation::{Model as ParticipationModel, ParticipationStatus},
    user::{Model as UserModel, Role},
};
use sea_orm::{DatabaseConnection, DbErr};
use serde::Serialize;
use validator::ValidationErrors;

/// Highest page number any listing accepts. Keeps `page * per_page` far from overflow.
pub const MAX_PAGE: u64 = 10_000;

/// Status code plus JSON envelope, the return shape of every handler.
pub type Reply<T> = (StatusCode, Json<ApiResponse<T>>);

/// Joins every field error message with `; `.
///
/// Errors declared without a message fall back to `"<field> is invalid"`.
pub fn format_validation_errors(errors: &ValidationErrors) -> String {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));

    fields
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| {
                e.message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("{field} is invalid"))
            })
        })
        .collect::<Vec<_>>()
        .join("; ")
}

pub fn error_reply<T>(status: StatusCode, message: impl Into<String>) -> Reply<T>
where
    T: Serialize + Default,
{
    (status, Json(ApiResponse::error(message)))
}

/// Logs the database error and hides it behind a generic 500.
pub fn db_error<T>(err: DbErr) -> Reply<T>
where
    T: Serialize + Default,
{
    tracing::error!(error = %err, "database error");
    error_reply(StatusCode::INTERNAL_SERVER_ERROR, "Database error")
}

/// Loads the account behind the token.
///
/// A token whose user has since been deleted is treated as unauthenticated.
pub async fn load_caller<T>(db: &DatabaseConnection, claims: &Claims) -> Result<UserModel, Reply<T>>
where
    T: Serialize + Default,
{
    match UserModel::find(db, claims.sub).await {
        Ok(Some(user)) => Ok(user),
        Ok(None) => Err(error_reply(
            StatusCode::UNAUTHORIZED,
            "Authentication required",
        )),
        Err(e) => Err(db_error(e)),
    }
}

pub async fn load_contest<T>(db: &DatabaseConnection, id: i64) -> Result<ContestModel, Reply<T>>
where
    T: Serialize + Default,
{
    match ContestModel::find(db, id).await {
        Ok(Some(contest)) => Ok(contest),
        Ok(None) => Err(error_reply(StatusCode::NOT_FOUND, "Contest not found")),
        Err(e) => Err(db_error(e)),
    }
}

#[derive(Debug, Serialize, Default)]
pub struct UserResponse {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub photo_url: Option<String>,
    pub role: Role,
    pub win_count: i64,
    pub created_at: String,
    pub updated_at: String,
}

impl From<UserModel> for UserResponse {
    fn from(user: UserModel) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            photo_url: user.photo_url,
            role: user.role,
            win_count: user.win_count,
            created_at: user.created_at.to_rfc3339(),
            updated_at: user.updated_at.to_rfc3339(),
        }
    }
}

/// Profile plus a freshly issued token, returned by login and registration.
#[derive(Debug, Serialize, Default)]
pub struct AuthResponse {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub photo_url: Option<String>,
    pub role: Role,
    pub token: String,
    pub expires_at: String,
}

impl AuthResponse {
    pub fn issue(user: UserModel) -> Result<Self, jsonwebtoken::errors::Error> {
        let (token, expires_at) = generate_jwt(user.id, user.role)?;
        Ok(Self {
            id: user.id,
            name: user.name,
            email: user.email,
            photo_url: user.photo_url,
            role: user.role,
            token,
            expires_at,
        })
    }
}

#[derive(Debug, Serialize, Default)]
pub struct ContestResponse {
    pub id: i64,
    pub name: String,
    pub image: Option<String>,
    pub description: String,
    pub price: f64,
    pub prize_money: f64,
    pub task_instruction: String,
    pub category: String,
    pub deadline: String,
    pub creator_email: String,
    pub creator_name: String,
    pub status: ContestStatus,
    pub participation_count: i64,
    pub winner_email: Option<String>,
    pub winner_name: Option<String>,
    pub winner_photo: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<ContestModel> for ContestResponse {
    fn from(c: ContestModel) -> Self {
        Self {
            id: c.id,
            name: c.name,
            image: c.image,
            description: c.description,
            price: c.price,
            prize_money: c.prize_money,
            task_instruction: c.task_instruction,
            category: c.category,
            deadline: c.deadline.to_rfc3339(),
            creator_email: c.creator_email,
            creator_name: c.creator_name,
            status: c.status,
            participation_count: c.participation_count,
            winner_email: c.winner_email,
            winner_name: c.winner_name,
            winner_photo: c.winner_photo,
            created_at: c.created_at.to_rfc3339(),
            updated_at: c.updated_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize, Default)]
pub struct ParticipationResponse {
    pub id: i64,
    pub contest_id: i64,
    pub contest_name: String,
    pub user_email: String,
    pub transaction_id: String,
    pub price: f64,
    pub status: ParticipationStatus,
    pub deadline: Option<String>,
    pub submitted_task: Option<String>,
    pub submitted_at: Option<String>,
    pub payment_date: String,
}

impl From<ParticipationModel> for ParticipationResponse {
    fn from(p: ParticipationModel) -> Self {
        Self {
            id: p.id,
            contest_id: p.contest_id,
            contest_name: p.contest_name,
            user_email: p.user_email,
            transaction_id: p.transaction_id,
            price: p.price,
            status: p.status,
            deadline: p.deadline.map(|d| d.to_rfc3339()),
            submitted_task: p.submitted_task,
            submitted_at: p.submitted_at.map(|d| d.to_rfc3339()),
            payment_date: p.payment_date.to_rfc3339(),
        }
    }
}
