use crate::auth::AuthUser;
use crate::response::ApiResponse;
use crate::routes::common::{ContestResponse, Reply, db_error, load_caller, load_contest};
use crate::state::AppState;
use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use db::models::contest::Model as ContestModel;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct ListContestsQuery {
    /// Creator email filter, honoured for admins only.
    pub email: Option<String>,
}

/// GET /api/contests
///
/// Contests managed by the caller, newest first. Creators always get their own
/// contests; admins get every contest, or one creator's with `?email=`.
pub async fn list_contests(
    State(app_state): State<AppState>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    Query(query): Query<ListContestsQuery>,
) -> Reply<Vec<ContestResponse>> {
    let db = app_state.db();
    let caller = match load_caller(db, &claims).await {
        Ok(user) => user,
        Err(reply) => return reply,
    };

    let creator = if claims.is_admin() {
        query.email.as_deref().filter(|e| !e.is_empty())
    } else {
        Some(caller.email.as_str())
    };

    match ContestModel::find_by_creator(db, creator).await {
        Ok(contests) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                contests.into_iter().map(ContestResponse::from).collect(),
                "Contests retrieved successfully",
            )),
        ),
        Err(e) => db_error(e),
    }
}

/// GET /api/contests/{id}
///
/// Public contest details.
///
/// ### Responses
/// - `200 OK` with the contest
/// - `404 Not Found` "Contest not found"
pub async fn get_contest(
    State(app_state): State<AppState>,
    Path(id): Path<i64>,
) -> Reply<ContestResponse> {
    match load_contest(app_state.db(), id).await {
        Ok(contest) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                ContestResponse::from(contest),
                "Contest retrieved successfully",
            )),
        ),
        Err(reply) => reply,
    }
}
