use crate::response::ApiResponse;
use crate::routes::common::{Reply, UserResponse, db_error, error_reply, format_validation_errors};
use crate::state::AppState;
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use db::models::user::{Column as UserColumn, Entity as UserEntity, Model as UserModel, Role};
use sea_orm::{ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct ListUsersQuery {
    #[validate(range(min = 1, max = 10000, message = "Page must be between 1 and 10000"))]
    pub page: Option<u64>,
    #[validate(range(min = 1, max = 100, message = "Per page must be between 1 and 100"))]
    pub per_page: Option<u64>,
    pub sort: Option<String>,
    pub query: Option<String>,
    pub role: Option<Role>,
}

#[derive(Debug, Serialize, Default)]
pub struct UsersListResponse {
    pub users: Vec<UserResponse>,
    pub page: u64,
    pub per_page: u64,
    pub total: u64,
}

/// GET /api/users
///
/// Retrieve a paginated list of users with optional filtering and sorting.
/// Requires admin privileges.
///
/// ### Query Parameters
/// - `page` (optional): Page number (default: 1, min: 1, max: 10000)
/// - `per_page` (optional): Items per page (default: 20, min: 1, max: 100)
/// - `query` (optional): Case-insensitive partial match against email OR name
/// - `role` (optional): `user`, `creator` or `admin`
/// - `sort` (optional): Comma-separated sort fields (`name`, `email`, `created_at`,
///   `win_count`). Use `-` prefix for descending
///
/// ### Examples
/// ```http
/// GET /api/users?page=2&per_page=10
/// GET /api/users?query=ada&role=creator
/// GET /api/users?sort=-win_count,name
/// ```
///
/// ### Responses
/// - `200 OK` with `{ users, page, per_page, total }`
/// - `400 Bad Request` - Invalid query parameters
/// - `401 Unauthorized` - Missing or invalid JWT
/// - `403 Forbidden` - Authenticated but not admin user
/// - `500 Internal Server Error` - Database error
pub async fn list_users(
    State(app_state): State<AppState>,
    Query(query): Query<ListUsersQuery>,
) -> Reply<UsersListResponse> {
    if let Err(e) = query.validate() {
        return error_reply(StatusCode::BAD_REQUEST, format_validation_errors(&e));
    }

    let page = query.page.unwrap_or(1);
    let per_page = query.per_page.unwrap_or(20);

    let mut condition = Condition::all();

    if let Some(q) = query.query.as_deref().map(str::trim).filter(|q| !q.is_empty()) {
        condition = condition.add(
            Condition::any()
                .add(UserColumn::Email.contains(q))
                .add(UserColumn::Name.contains(q)),
        );
    }

    if let Some(role) = query.role {
        condition = condition.add(UserColumn::Role.eq(role));
    }

    let mut query_builder = UserEntity::find().filter(condition);

    match &query.sort {
        Some(sort_param) => {
            for sort_field in sort_param.split(',').map(str::trim) {
                let (field, desc) = match sort_field.strip_prefix('-') {
                    Some(field) => (field, true),
                    None => (sort_field, false),
                };

                let column = match field {
                    "name" => UserColumn::Name,
                    "email" => UserColumn::Email,
                    "created_at" => UserColumn::CreatedAt,
                    "win_count" => UserColumn::WinCount,
                    _ => continue,
                };

                query_builder = if desc {
                    query_builder.order_by_desc(column)
                } else {
                    query_builder.order_by_asc(column)
                };
            }
            query_builder = query_builder.order_by_asc(UserColumn::Id);
        }
        None => {
            query_builder = query_builder.order_by_asc(UserColumn::Id);
        }
    }

    let paginator = query_builder.paginate(app_state.db(), per_page);
    let total = match paginator.num_items().await {
        Ok(total) => total,
        Err(e) => return db_error(e),
    };

    match paginator.fetch_page(page - 1).await {
        Ok(users) => {
            let response = UsersListResponse {
                users: users.into_iter().map(UserResponse::from).collect(),
                page,
                per_page,
                total,
            };
            (
                StatusCode::OK,
                Json(ApiResponse::success(response, "Users retrieved successfully")),
            )
        }
        Err(e) => db_error(e),
    }
}

#[derive(Debug, Serialize, Default)]
pub struct RoleResponse {
    pub role: Role,
}

/// GET /api/users/role/{email}
///
/// Role of the user with the given email. Unknown emails report `user`.
pub async fn get_role(
    State(app_state): State<AppState>,
    Path(email): Path<String>,
) -> Reply<RoleResponse> {
    match UserModel::role_for_email(app_state.db(), &email).await {
        Ok(role) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                RoleResponse { role },
                "Role retrieved successfully",
            )),
        ),
        Err(e) => db_error(e),
    }
}
