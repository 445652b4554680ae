use crate::response::ApiResponse;
use crate::routes::common::{ContestResponse, MAX_PAGE, Reply, db_error};
use crate::state::AppState;
use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};
use db::models::{
    contest::{ContestSearch, ListingSort, Model as ContestModel},
    participation::Model as ParticipationModel,
    user::Model as UserModel,
};
use serde::{Deserialize, Serialize};

const DEFAULT_PAGE_SIZE: u64 = 6;
const MAX_PAGE_SIZE: u64 = 100;
const POPULAR_LIMIT: u64 = 6;

/// Raw listing parameters. `page` and `size` are kept as strings so that garbage
/// falls back to defaults instead of rejecting the request.
#[derive(Debug, Deserialize, Default)]
pub struct AllContestsQuery {
    pub search: Option<String>,
    pub category: Option<String>,
    pub sort: Option<String>,
    pub page: Option<String>,
    pub size: Option<String>,
}

impl AllContestsQuery {
    fn into_search(self) -> ContestSearch {
        let page = self
            .page
            .as_deref()
            .and_then(|p| p.trim().parse::<i64>().ok())
            .filter(|p| *p > 0)
            .map_or(1, |p| (p as u64).min(MAX_PAGE));

        let size = self
            .size
            .as_deref()
            .and_then(|s| s.trim().parse::<u64>().ok())
            .filter(|s| *s > 0)
            .map_or(DEFAULT_PAGE_SIZE, |s| s.min(MAX_PAGE_SIZE));

        let sort = match self.sort.as_deref() {
            Some("asc") => ListingSort::PriceAsc,
            Some("desc") => ListingSort::PriceDesc,
            _ => ListingSort::Newest,
        };

        ContestSearch {
            search: self.search,
            category: self.category,
            sort,
            page,
            size,
        }
    }
}

#[derive(Debug, Serialize, Default)]
pub struct ContestListResponse {
    pub contests: Vec<ContestResponse>,
    pub total_pages: u64,
    pub total_count: u64,
}

/// GET /api/all-contests
///
/// Accepted contests only.
///
/// ### Query Parameters
/// - `search`: case-insensitive substring of the name
/// - `category`: exact category, `All` for every category
/// - `sort`: `asc` / `desc` by price, newest first otherwise
/// - `page`: 1-based, invalid values mean 1, at most 10000
/// - `size`: page size, default 6, at most 100
///
/// ### Response
/// ```json
/// {
///   "success": true,
///   "data": { "contests": [], "total_pages": 0, "total_count": 0 },
///   "message": "Contests retrieved successfully"
/// }
/// ```
pub async fn all_contests(
    State(app_state): State<AppState>,
    Query(query): Query<AllContestsQuery>,
) -> Reply<ContestListResponse> {
    let search = query.into_search();

    match ContestModel::search_accepted(app_state.db(), &search).await {
        Ok((contests, total)) => {
            let response = ContestListResponse {
                contests: contests.into_iter().map(ContestResponse::from).collect(),
                total_pages: total.div_ceil(search.size),
                total_count: total,
            };
            (
                StatusCode::OK,
                Json(ApiResponse::success(response, "Contests retrieved successfully")),
            )
        }
        Err(e) => db_error(e),
    }
}

/// GET /api/popular-contests
///
/// The six accepted contests with the most participants.
pub async fn popular_contests(State(app_state): State<AppState>) -> Reply<Vec<ContestResponse>> {
    match ContestModel::popular(app_state.db(), POPULAR_LIMIT).await {
        Ok(contests) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                contests.into_iter().map(ContestResponse::from).collect(),
                "Popular contests retrieved successfully",
            )),
        ),
        Err(e) => db_error(e),
    }
}

#[derive(Debug, Serialize, Default)]
pub struct PublicStats {
    pub total_participants: u64,
    pub total_contests: u64,
    pub total_winners: u64,
}

/// GET /api/stats
///
/// Homepage counters: participations, accepted contests, contests with a winner.
pub async fn public_stats(State(app_state): State<AppState>) -> Reply<PublicStats> {
    let db = app_state.db();

    let stats = async {
        Ok::<_, sea_orm::DbErr>(PublicStats {
            total_participants: ParticipationModel::count_all(db).await?,
            total_contests: ContestModel::count_accepted(db).await?,
            total_winners: ContestModel::count_with_winner(db).await?,
        })
    }
    .await;

    match stats {
        Ok(stats) => (
            StatusCode::OK,
            Json(ApiResponse::success(stats, "Stats retrieved successfully")),
        ),
        Err(e) => db_error(e),
    }
}

#[derive(Debug, Serialize, Default)]
pub struct AdminStats {
    pub users: u64,
    pub contests: u64,
    pub revenue: f64,
}

/// GET /api/admin-stats
///
/// Dashboard totals for admins. `revenue` is the sum of all participation
/// prices, rounded to cents.
pub async fn admin_stats(State(app_state): State<AppState>) -> Reply<AdminStats> {
    let db = app_state.db();

    let stats = async {
        Ok::<_, sea_orm::DbErr>(AdminStats {
            users: UserModel::count_all(db).await?,
            contests: ContestModel::count_all(db).await?,
            revenue: ParticipationModel::total_revenue(db).await?,
        })
    }
    .await;

    match stats {
        Ok(stats) => (
            StatusCode::OK,
            Json(ApiResponse::success(stats, "Admin stats retrieved successfully")),
        ),
        Err(e) => db_error(e),
    }
}
