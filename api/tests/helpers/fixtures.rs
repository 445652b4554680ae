use api::auth::generate_jwt;
use axum::{
    body::Body,
    http::{Request, header},
    response::Response,
};
use chrono::{Duration, Utc};
use db::models::{
    contest::{ContestStatus, Model as ContestModel, NewContest},
    participation::{Model as ParticipationModel, NewParticipation, RecordOutcome},
    user::{Model as UserModel, Role},
};
use sea_orm::DatabaseConnection;
use serde_json::Value;

pub const PASSWORD: &str = "password123";

pub async fn create_user(db: &DatabaseConnection, name: &str, role: Role) -> UserModel {
    let email = format!("{}@test.com", name.to_lowercase());
    UserModel::create(db, name, &email, PASSWORD, None, role)
        .await
        .expect("Failed to create user")
}

pub fn token_for(user: &UserModel) -> String {
    generate_jwt(user.id, user.role).expect("Failed to sign token").0
}

/// Contest owned by `creator`, in `status`, with its deadline `days` from now
/// (negative for the past).
pub async fn create_contest(
    db: &DatabaseConnection,
    creator: &UserModel,
    name: &str,
    status: ContestStatus,
    days: i64,
) -> ContestModel {
    let contest = ContestModel::create(
        db,
        NewContest {
            name: name.to_string(),
            image: None,
            description: format!("{name} description"),
            price: 10.0,
            prize_money: 100.0,
            task_instruction: "Share a link".to_string(),
            category: "Design".to_string(),
            deadline: Utc::now() + Duration::days(days),
            creator_email: creator.email.clone(),
            creator_name: creator.name.clone(),
        },
    )
    .await
    .expect("Failed to create contest");

    if status == ContestStatus::Pending {
        return contest;
    }
    ContestModel::set_status(db, contest.id, status)
        .await
        .expect("Failed to set contest status")
}

pub async fn create_participation(
    db: &DatabaseConnection,
    contest: &ContestModel,
    user: &UserModel,
    transaction_id: &str,
) -> ParticipationModel {
    let outcome = ParticipationModel::record_payment(
        db,
        NewParticipation {
            contest_id: contest.id,
            contest_name: contest.name.clone(),
            user_email: user.email.clone(),
            transaction_id: transaction_id.to_string(),
            price: contest.price,
            deadline: Some(contest.deadline),
        },
    )
    .await
    .expect("Failed to record payment");

    match outcome {
        RecordOutcome::Recorded(p) => p,
        RecordOutcome::AlreadyRecorded => panic!("transaction {transaction_id} already recorded"),
    }
}

pub fn request(method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

pub async fn json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}
