use crate::response::ApiResponse;
use crate::routes::common::{MAX_PAGE, Reply, db_error};
use crate::state::AppState;
use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};
use db::models::user::Model as UserModel;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct LeaderboardQuery {
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}

#[derive(Debug, Serialize, Default)]
pub struct LeaderboardEntry {
    pub rank: u64,
    pub name: String,
    pub photo_url: Option<String>,
    pub win_count: i64,
}

#[derive(Debug, Serialize, Default)]
pub struct LeaderboardResponse {
    pub users: Vec<LeaderboardEntry>,
    pub page: u64,
    pub per_page: u64,
    pub total: u64,
}

/// GET /api/leaderboard
///
/// Users with at least one win, most wins first, ties broken by name.
///
/// ### Query Parameters
/// - `page` (optional): 1-based, default 1, clamped to 10000
/// - `per_page` (optional): default 10, clamped to 1..=100
pub async fn leaderboard(
    State(app_state): State<AppState>,
    Query(query): Query<LeaderboardQuery>,
) -> Reply<LeaderboardResponse> {
    let page = query.page.unwrap_or(1).clamp(1, MAX_PAGE);
    let per_page = query.per_page.unwrap_or(10).clamp(1, 100);

    match UserModel::leaderboard(app_state.db(), page, per_page).await {
        Ok((users, total)) => {
            let offset = (page - 1).saturating_mul(per_page);
            let users = users
                .into_iter()
                .enumerate()
                .map(|(i, user)| LeaderboardEntry {
                    rank: offset.saturating_add(i as u64 + 1),
                    name: user.name,
                    photo_url: user.photo_url,
                    win_count: user.win_count,
                })
                .collect();

            (
                StatusCode::OK,
                Json(ApiResponse::success(
                    LeaderboardResponse {
                        users,
                        page,
                        per_page,
                        total,
                    },
                    "Leaderboard retrieved successfully",
                )),
            )
        }
        Err(e) => db_error(e),
    }
}
