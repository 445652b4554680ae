use crate::auth::AuthUser;
use crate::response::ApiResponse;
use crate::routes::common::{
    ParticipationResponse, Reply, db_error, error_reply, format_validation_errors, load_caller,
    load_contest,
};
use crate::services::payment::{CheckoutRequest, PaymentError};
use crate::state::AppState;
use axum::{Extension, Json, extract::State, http::StatusCode};
use chrono::Utc;
use db::models::{
    contest::ContestStatus,
    participation::{Model as ParticipationModel, NewParticipation, RecordOutcome},
};
use serde::{Deserialize, Serialize};
use util::config;
use validator::Validate;

/// Maps a gateway failure onto the reply the client sees.
fn payment_error<T>(err: PaymentError) -> Reply<T>
where
    T: Serialize + Default,
{
    match err {
        PaymentError::NotConfigured => {
            error_reply(StatusCode::SERVICE_UNAVAILABLE, "Payments are not configured")
        }
        PaymentError::SessionNotFound(_) => {
            error_reply(StatusCode::NOT_FOUND, "Checkout session not found")
        }
        other => {
            tracing::error!(error = %other, "payment provider request failed");
            error_reply(StatusCode::BAD_GATEWAY, "Payment provider error")
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CheckoutBody {
    pub contest_id: i64,
}

#[derive(Debug, Serialize, Default)]
pub struct CheckoutResponse {
    pub url: String,
}

/// POST /api/payments/checkout
///
/// Opens a hosted checkout page for the contest's entry fee. The amount always
/// comes from the stored contest.
///
/// ### Request Body
/// ```json
/// { "contest_id": 7 }
/// ```
///
/// ### Responses
/// - `200 OK` with `{ "url": "https://checkout.stripe.com/..." }`
/// - `400 Bad Request` "Contest is not open for registration" / "Contest deadline has passed"
/// - `404 Not Found` "Contest not found"
/// - `409 Conflict` "You are already registered for this contest"
/// - `502 Bad Gateway` / `503 Service Unavailable` on provider failures
pub async fn create_checkout(
    State(app_state): State<AppState>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    Json(body): Json<CheckoutBody>,
) -> Reply<CheckoutResponse> {
    let db = app_state.db();

    let contest = match load_contest(db, body.contest_id).await {
        Ok(contest) => contest,
        Err(reply) => return reply,
    };
    if contest.status != ContestStatus::Accepted {
        return error_reply(StatusCode::BAD_REQUEST, "Contest is not open for registration");
    }
    if contest.deadline_passed(Utc::now()) {
        return error_reply(StatusCode::BAD_REQUEST, "Contest deadline has passed");
    }

    let caller = match load_caller(db, &claims).await {
        Ok(user) => user,
        Err(reply) => return reply,
    };

    match ParticipationModel::exists_for_user(db, contest.id, &caller.email).await {
        Ok(true) => {
            return error_reply(
                StatusCode::CONFLICT,
                "You are already registered for this contest",
            );
        }
        Ok(false) => {}
        Err(e) => return db_error(e),
    }

    let client_url = config::client_url();
    let client_url = client_url.trim_end_matches('/');
    let request = CheckoutRequest {
        contest_id: contest.id,
        contest_name: contest.name.clone(),
        amount_minor: contest.price_minor_units(),
        currency: config::payment_currency(),
        cost: contest.price.to_string(),
        customer_email: caller.email,
        success_url: format!(
            "{client_url}/dashboard/my-participated?session_id={{CHECKOUT_SESSION_ID}}&contestId={}",
            contest.id
        ),
        cancel_url: format!("{client_url}/payment/{}", contest.id),
    };

    let session = match app_state.payments().create_checkout_session(&request).await {
        Ok(session) => session,
        Err(e) => return payment_error(e),
    };

    match session.url {
        Some(url) => {
            tracing::info!(contest_id = contest.id, session_id = %session.id, "checkout session created");
            (
                StatusCode::OK,
                Json(ApiResponse::success(
                    CheckoutResponse { url },
                    "Checkout session created",
                )),
            )
        }
        None => {
            tracing::error!(session_id = %session.id, "checkout session has no redirect url");
            error_reply(StatusCode::BAD_GATEWAY, "Payment provider error")
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct VerifyBody {
    #[validate(length(min = 1, message = "Session id is required"))]
    pub session_id: String,
    pub contest_id: i64,
}

#[derive(Debug, Serialize, Default)]
pub struct VerifyResponse {
    pub verified: bool,
    pub participation: Option<ParticipationResponse>,
}

/// POST /api/payments/verify
///
/// Confirms a completed checkout and records the participation. Safe to call
/// repeatedly: the payment's transaction id is recorded at most once, and the
/// contest's participant count is bumped together with that single insert.
///
/// ### Request Body
/// ```json
/// { "session_id": "cs_test_...", "contest_id": 7 }
/// ```
///
/// ### Responses
/// - `201 Created` when the participation was recorded now
/// - `200 OK` when the payment had already been recorded
/// - `402 Payment Required` when the session is not paid
/// - `400 Bad Request` when the session does not name this contest in its metadata
/// - `404 Not Found` for an unknown session or contest
pub async fn verify_payment(
    State(app_state): State<AppState>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    Json(body): Json<VerifyBody>,
) -> Reply<VerifyResponse> {
    if let Err(e) = body.validate() {
        return error_reply(StatusCode::BAD_REQUEST, format_validation_errors(&e));
    }

    let session = match app_state.payments().retrieve_session(&body.session_id).await {
        Ok(session) => session,
        Err(e) => return payment_error(e),
    };

    if !session.paid {
        return error_reply(StatusCode::PAYMENT_REQUIRED, "Payment has not been completed");
    }

    if session.metadata_contest_id() != Some(body.contest_id) {
        return error_reply(
            StatusCode::BAD_REQUEST,
            "Checkout session does not belong to this contest",
        );
    }

    let db = app_state.db();
    let contest = match load_contest(db, body.contest_id).await {
        Ok(contest) => contest,
        Err(reply) => return reply,
    };

    let user_email = match session.customer_email.clone() {
        Some(email) => email,
        None => match load_caller(db, &claims).await {
            Ok(user) => user.email,
            Err(reply) => return reply,
        },
    };

    let new = NewParticipation {
        contest_id: contest.id,
        contest_name: contest.name.clone(),
        user_email,
        transaction_id: session.transaction_id().to_string(),
        price: session.metadata_cost().unwrap_or(contest.price),
        deadline: Some(contest.deadline),
    };

    match ParticipationModel::record_payment(db, new).await {
        Ok(RecordOutcome::Recorded(participation)) => {
            tracing::info!(
                contest_id = contest.id,
                participation_id = participation.id,
                "payment verified and participation recorded"
            );
            (
                StatusCode::CREATED,
                Json(ApiResponse::success(
                    VerifyResponse {
                        verified: true,
                        participation: Some(participation.into()),
                    },
                    "Payment verified successfully",
                )),
            )
        }
        Ok(RecordOutcome::AlreadyRecorded) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                VerifyResponse {
                    verified: true,
                    participation: None,
                },
                "Payment already verified",
            )),
        ),
        Err(e) => db_error(e),
    }
}
