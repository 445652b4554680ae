use crate::helpers::{
    fixtures::{create_contest, create_user, json_body, request, token_for},
    make_test_app,
};
use axum::http::StatusCode;
use db::models::{
    contest::{ContestStatus, Model as ContestModel},
    user::Role,
};
use serde_json::json;
use serial_test::serial;
use tower::ServiceExt;

fn contest_body() -> serde_json::Value {
    json!({
        "name": "Logo Sprint",
        "description": "Design a logo",
        "price": 12.5,
        "prize_money": 300.0,
        "task_instruction": "Share a link to your design",
        "category": "Design",
        "deadline": "2099-01-01T00:00:00Z"
    })
}

#[tokio::test]
#[serial]
async fn creator_creates_pending_contest() {
    let (app, state) = make_test_app().await;
    let creator = create_user(state.db(), "Maker", Role::Creator).await;

    let response = app
        .oneshot(request(
            "POST",
            "/api/contests",
            Some(&token_for(&creator)),
            Some(contest_body()),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = json_body(response).await;
    assert_eq!(json["data"]["status"], "pending");
    assert_eq!(json["data"]["participation_count"], 0);
    assert_eq!(json["data"]["creator_email"], "maker@test.com");
    assert_eq!(json["data"]["creator_name"], "Maker");
    assert_eq!(json["data"]["price"], 12.5);
}

#[tokio::test]
#[serial]
async fn create_contest_rejects_negative_price() {
    let (app, state) = make_test_app().await;
    let creator = create_user(state.db(), "Maker", Role::Creator).await;

    let mut body = contest_body();
    body["price"] = json!(-1.0);
    let response = app
        .oneshot(request("POST", "/api/contests", Some(&token_for(&creator)), Some(body)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["message"], "Price cannot be negative");
}

#[tokio::test]
#[serial]
async fn plain_user_cannot_create_contest() {
    let (app, state) = make_test_app().await;
    let user = create_user(state.db(), "Plain", Role::User).await;

    let response = app
        .oneshot(request("POST", "/api/contests", Some(&token_for(&user)), Some(contest_body())))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
#[serial]
async fn creator_lists_only_own_contests_and_admin_filters() {
    let (app, state) = make_test_app().await;
    let db = state.db();
    let admin = create_user(db, "Root", Role::Admin).await;
    let maker = create_user(db, "Maker", Role::Creator).await;
    let other = create_user(db, "Other", Role::Creator).await;
    create_contest(db, &maker, "Mine", ContestStatus::Pending, 5).await;
    create_contest(db, &other, "Theirs", ContestStatus::Accepted, 5).await;

    let response = app
        .clone()
        .oneshot(request("GET", "/api/contests", Some(&token_for(&maker)), None))
        .await
        .unwrap();
    let json = json_body(response).await;
    let contests = json["data"].as_array().unwrap();
    assert_eq!(contests.len(), 1);
    assert_eq!(contests[0]["name"], "Mine");

    let response = app
        .clone()
        .oneshot(request("GET", "/api/contests", Some(&token_for(&admin)), None))
        .await
        .unwrap();
    assert_eq!(json_body(response).await["data"].as_array().unwrap().len(), 2);

    let response = app
        .oneshot(request(
            "GET",
            "/api/contests?email=other@test.com",
            Some(&token_for(&admin)),
            None,
        ))
        .await
        .unwrap();
    let json = json_body(response).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);
    assert_eq!(json["data"][0]["name"], "Theirs");
}

#[tokio::test]
#[serial]
async fn contest_details_are_public() {
    let (app, state) = make_test_app().await;
    let maker = create_user(state.db(), "Maker", Role::Creator).await;
    let contest = create_contest(state.db(), &maker, "Open", ContestStatus::Accepted, 5).await;

    let response = app
        .clone()
        .oneshot(request("GET", &format!("/api/contests/{}", contest.id), None, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["data"]["name"], "Open");

    let response = app
        .oneshot(request("GET", "/api/contests/4242", None, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(json_body(response).await["message"], "Contest not found");
}

#[tokio::test]
#[serial]
async fn owner_edits_pending_contest_but_not_status() {
    let (app, state) = make_test_app().await;
    let maker = create_user(state.db(), "Maker", Role::Creator).await;
    let contest = create_contest(state.db(), &maker, "Draft", ContestStatus::Pending, 5).await;

    let body = json!({ "name": "Renamed", "price": 20.0, "status": "accepted" });
    let response = app
        .oneshot(request(
            "PATCH",
            &format!("/api/contests/{}", contest.id),
            Some(&token_for(&maker)),
            Some(body),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = json_body(response).await;
    assert_eq!(json["data"]["name"], "Renamed");
    assert_eq!(json["data"]["price"], 20.0);
    assert_eq!(json["data"]["status"], "pending");
    assert_eq!(json["data"]["description"], "Draft description");
}

#[tokio::test]
#[serial]
async fn non_owner_cannot_edit_and_owner_cannot_edit_accepted() {
    let (app, state) = make_test_app().await;
    let db = state.db();
    let maker = create_user(db, "Maker", Role::Creator).await;
    let other = create_user(db, "Other", Role::Creator).await;
    let pending = create_contest(db, &maker, "Draft", ContestStatus::Pending, 5).await;
    let accepted = create_contest(db, &maker, "Live", ContestStatus::Accepted, 5).await;
    let body = json!({ "name": "Hijacked" });

    let response = app
        .clone()
        .oneshot(request(
            "PATCH",
            &format!("/api/contests/{}", pending.id),
            Some(&token_for(&other)),
            Some(body.clone()),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .oneshot(request(
            "PATCH",
            &format!("/api/contests/{}", accepted.id),
            Some(&token_for(&maker)),
            Some(body),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[serial]
async fn admin_approves_contest() {
    let (app, state) = make_test_app().await;
    let admin = create_user(state.db(), "Root", Role::Admin).await;
    let maker = create_user(state.db(), "Maker", Role::Creator).await;
    let contest = create_contest(state.db(), &maker, "Draft", ContestStatus::Pending, 5).await;

    let uri = format!("/api/contests/{}/status", contest.id);
    let response = app
        .clone()
        .oneshot(request("PATCH", &uri, Some(&token_for(&maker)), Some(json!({ "status": "accepted" }))))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .oneshot(request("PATCH", &uri, Some(&token_for(&admin)), Some(json!({ "status": "accepted" }))))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["data"]["status"], "accepted");
}

#[tokio::test]
#[serial]
async fn only_admin_deletes_accepted_contest() {
    let (app, state) = make_test_app().await;
    let db = state.db();
    let admin = create_user(db, "Root", Role::Admin).await;
    let maker = create_user(db, "Maker", Role::Creator).await;
    let accepted = create_contest(db, &maker, "Live", ContestStatus::Accepted, 5).await;
    let rejected = create_contest(db, &maker, "Nope", ContestStatus::Rejected, 5).await;

    let uri = format!("/api/contests/{}", accepted.id);
    let response = app
        .clone()
        .oneshot(request("DELETE", &uri, Some(&token_for(&maker)), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        json_body(response).await["message"],
        "Only Admin can delete an accepted or completed contest."
    );

    let response = app
        .clone()
        .oneshot(request("DELETE", &uri, Some(&token_for(&admin)), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(request(
            "DELETE",
            &format!("/api/contests/{}", rejected.id),
            Some(&token_for(&maker)),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    assert!(ContestModel::find(db, accepted.id).await.unwrap().is_none());
    assert!(ContestModel::find(db, rejected.id).await.unwrap().is_none());
}

#[tokio::test]
#[serial]
async fn blank_text_fields_fail_validation() {
    let (app, state) = make_test_app().await;
    let creator = create_user(state.db(), "Maker", Role::Creator).await;
    let token = token_for(&creator);

    let mut body = contest_body();
    body["name"] = json!("   ");
    body["category"] = json!("\t");
    let response = app
        .clone()
        .oneshot(request("POST", "/api/contests", Some(&token), Some(body)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let message = json_body(response).await["message"].as_str().unwrap().to_string();
    assert!(message.contains("Name is required"));
    assert!(message.contains("Category is required"));

    let contest = create_contest(state.db(), &creator, "Draft", ContestStatus::Pending, 5).await;
    let response = app
        .oneshot(request(
            "PATCH",
            &format!("/api/contests/{}", contest.id),
            Some(&token),
            Some(json!({ "name": "  " })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["message"], "Name cannot be empty");
}

#[tokio::test]
#[serial]
async fn completed_contest_status_is_locked() {
    let (app, state) = make_test_app().await;
    let admin = create_user(state.db(), "Root", Role::Admin).await;
    let maker = create_user(state.db(), "Maker", Role::Creator).await;
    let contest = create_contest(state.db(), &maker, "Done", ContestStatus::Completed, 5).await;

    let response = app
        .oneshot(request(
            "PATCH",
            &format!("/api/contests/{}/status", contest.id),
            Some(&token_for(&admin)),
            Some(json!({ "status": "accepted" })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["message"], "Completed contests cannot change status");

    let stored = ContestModel::find(state.db(), contest.id).await.unwrap().unwrap();
    assert_eq!(stored.status, ContestStatus::Completed);
}
