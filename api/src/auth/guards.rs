use crate::auth::claims::{AuthUser, Claims};
use crate::response::ApiResponse;
use crate::state::AppState;
use axum::{
    Json,
    body::Body,
    extract::{FromRequestParts, State},
    http::{Request, StatusCode},
    middleware::Next,
    response::Response,
};
use db::models::user::{Model as UserModel, Role};
use sea_orm::DatabaseConnection;

// --- Role Based Access Guards ---

#[derive(serde::Serialize, Default)]
pub struct Empty;

type GuardRejection = (StatusCode, Json<ApiResponse<Empty>>);

fn unauthorized() -> GuardRejection {
    (
        StatusCode::UNAUTHORIZED,
        Json(ApiResponse::error("Authentication required")),
    )
}

/// Helper to extract and validate the user from the request, then insert it back
/// into the request extensions for the handler.
///
/// The token only proves identity. The account is reloaded so that deleted users
/// are rejected and the role handed to handlers is the one currently stored.
async fn extract_and_insert_authuser(
    db: &DatabaseConnection,
    req: Request<Body>,
) -> Result<(Request<Body>, AuthUser), GuardRejection> {
    let (mut parts, body) = req.into_parts();
    let AuthUser(claims) = AuthUser::from_request_parts(&mut parts, &())
        .await
        .map_err(|_| unauthorized())?;

    let account = match UserModel::find(db, claims.sub).await {
        Ok(Some(account)) => account,
        Ok(None) => return Err(unauthorized()),
        Err(e) => {
            tracing::warn!(error = %e, user_id = claims.sub, "DB error while loading caller; denying access");
            return Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error("Database error")),
            ));
        }
    };

    if account.role != claims.role {
        tracing::debug!(
            user_id = account.id,
            token_role = %claims.role,
            current_role = %account.role,
            "role changed since token was issued"
        );
    }

    let user = AuthUser(Claims {
        role: account.role,
        ..claims
    });

    let mut req = Request::from_parts(parts, body);
    req.extensions_mut().insert(user.clone());
    Ok((req, user))
}

/// Basic guard to ensure the request is authenticated.
pub async fn allow_authenticated(
    State(app_state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, GuardRejection> {
    let (req, _user) = extract_and_insert_authuser(app_state.db(), req).await?;

    Ok(next.run(req).await)
}

/// Creator guard; admins pass as well.
pub async fn allow_creator(
    State(app_state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, GuardRejection> {
    let (req, user) = extract_and_insert_authuser(app_state.db(), req).await?;

    if !user.0.role.can_create_contests() {
        return Err((
            StatusCode::FORBIDDEN,
            Json(ApiResponse::error("Creator access required")),
        ));
    }

    Ok(next.run(req).await)
}

/// Admin-only guard.
pub async fn allow_admin(
    State(app_state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, GuardRejection> {
    let (req, user) = extract_and_insert_authuser(app_state.db(), req).await?;

    if user.0.role != Role::Admin {
        return Err((
            StatusCode::FORBIDDEN,
            Json(ApiResponse::error("Admin access required")),
        ));
    }

    Ok(next.run(req).await)
}
