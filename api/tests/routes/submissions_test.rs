use crate::helpers::{
    fixtures::{create_contest, create_participation, create_user, json_body, request, token_for},
    make_test_app,
};
use axum::http::StatusCode;
use db::models::{contest::ContestStatus, user::Role};
use serde_json::json;
use serial_test::serial;
use tower::ServiceExt;

#[tokio::test]
#[serial]
async fn participant_submits_and_resubmits_task() {
    let (app, state) = make_test_app().await;
    let db = state.db();
    let maker = create_user(db, "Maker", Role::Creator).await;
    let fan = create_user(db, "Fan", Role::User).await;
    let contest = create_contest(db, &maker, "Open", ContestStatus::Accepted, 5).await;
    let entry = create_participation(db, &contest, &fan, "pi_fan").await;
    let uri = format!("/api/participations/{}/submit", entry.id);
    let token = token_for(&fan);

    let response = app
        .clone()
        .oneshot(request("PATCH", &uri, Some(&token), Some(json!({ "task_link": "https://drive.test/v1" }))))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["data"]["status"], "submitted");
    assert_eq!(json["data"]["submitted_task"], "https://drive.test/v1");
    assert!(json["data"]["submitted_at"].is_string());

    let response = app
        .oneshot(request("PATCH", &uri, Some(&token), Some(json!({ "task_link": "https://drive.test/v2" }))))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["data"]["submitted_task"], "https://drive.test/v2");
}

#[tokio::test]
#[serial]
async fn submit_rejects_bad_link_stranger_and_missing_record() {
    let (app, state) = make_test_app().await;
    let db = state.db();
    let maker = create_user(db, "Maker", Role::Creator).await;
    let fan = create_user(db, "Fan", Role::User).await;
    let stranger = create_user(db, "Stranger", Role::User).await;
    let contest = create_contest(db, &maker, "Open", ContestStatus::Accepted, 5).await;
    let entry = create_participation(db, &contest, &fan, "pi_fan").await;
    let uri = format!("/api/participations/{}/submit", entry.id);

    let response = app
        .clone()
        .oneshot(request("PATCH", &uri, Some(&token_for(&fan)), Some(json!({ "task_link": "not a url" }))))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .clone()
        .oneshot(request("PATCH", &uri, Some(&token_for(&stranger)), Some(json!({ "task_link": "https://x.test" }))))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .oneshot(request(
            "PATCH",
            "/api/participations/9999/submit",
            Some(&token_for(&fan)),
            Some(json!({ "task_link": "https://x.test" })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(json_body(response).await["message"], "Participation record not found");
}

#[tokio::test]
#[serial]
async fn submit_after_deadline_is_rejected() {
    let (app, state) = make_test_app().await;
    let db = state.db();
    let maker = create_user(db, "Maker", Role::Creator).await;
    let fan = create_user(db, "Fan", Role::User).await;
    let contest = create_contest(db, &maker, "Closed", ContestStatus::Accepted, -1).await;
    let entry = create_participation(db, &contest, &fan, "pi_late").await;

    let response = app
        .oneshot(request(
            "PATCH",
            &format!("/api/participations/{}/submit", entry.id),
            Some(&token_for(&fan)),
            Some(json!({ "task_link": "https://drive.test/late" })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["message"], "Contest deadline has passed");
}

#[tokio::test]
#[serial]
async fn owner_reviews_only_submitted_entries() {
    let (app, state) = make_test_app().await;
    let db = state.db();
    let maker = create_user(db, "Maker", Role::Creator).await;
    let other = create_user(db, "Other", Role::Creator).await;
    let fan = create_user(db, "Fan", Role::User).await;
    let lurker = create_user(db, "Lurker", Role::User).await;
    let contest = create_contest(db, &maker, "Open", ContestStatus::Accepted, 5).await;
    let entry = create_participation(db, &contest, &fan, "pi_fan").await;
    create_participation(db, &contest, &lurker, "pi_lurker").await;
    db::models::participation::Model::submit_task(db, entry.id, "https://drive.test/fan")
        .await
        .unwrap();

    let uri = format!("/api/submissions/{}", contest.id);
    let response = app
        .clone()
        .oneshot(request("GET", &uri, Some(&token_for(&maker)), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    let rows = json["data"].as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["user_email"], "fan@test.com");

    let response = app
        .oneshot(request("GET", &uri, Some(&token_for(&other)), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}
