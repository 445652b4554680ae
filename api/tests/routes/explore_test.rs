use crate::helpers::{
    fixtures::{create_contest, create_participation, create_user, json_body, request, token_for},
    make_test_app,
};
use axum::http::StatusCode;
use db::models::{
    contest::{ContestChanges, ContestStatus, Model as ContestModel},
    user::Role,
};
use serial_test::serial;
use tower::ServiceExt;

#[tokio::test]
#[serial]
async fn all_contests_lists_only_accepted_with_paging() {
    let (app, state) = make_test_app().await;
    let db = state.db();
    let maker = create_user(db, "Maker", Role::Creator).await;
    for i in 0..7 {
        create_contest(db, &maker, &format!("Open {i}"), ContestStatus::Accepted, 5).await;
    }
    create_contest(db, &maker, "Hidden", ContestStatus::Pending, 5).await;
    create_contest(db, &maker, "Refused", ContestStatus::Rejected, 5).await;

    let response = app
        .clone()
        .oneshot(request("GET", "/api/all-contests", None, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["data"]["total_count"], 7);
    assert_eq!(json["data"]["total_pages"], 2);
    assert_eq!(json["data"]["contests"].as_array().unwrap().len(), 6);

    let response = app
        .oneshot(request("GET", "/api/all-contests?page=2", None, None))
        .await
        .unwrap();
    let json = json_body(response).await;
    assert_eq!(json["data"]["contests"].as_array().unwrap().len(), 1);
}

#[tokio::test]
#[serial]
async fn all_contests_filters_and_sorts() {
    let (app, state) = make_test_app().await;
    let db = state.db();
    let maker = create_user(db, "Maker", Role::Creator).await;

    for (name, category, price) in [
        ("Logo Rush", "Design", 30.0),
        ("Poster Jam", "Design", 5.0),
        ("Essay Cup", "Writing", 15.0),
    ] {
        let contest = create_contest(db, &maker, name, ContestStatus::Accepted, 5).await;
        ContestModel::update_details(
            db,
            contest.id,
            ContestChanges {
                category: Some(category.to_string()),
                price: Some(price),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    }

    let response = app
        .clone()
        .oneshot(request("GET", "/api/all-contests?category=Design&sort=asc", None, None))
        .await
        .unwrap();
    let json = json_body(response).await;
    let names: Vec<_> = json["data"]["contests"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(names, ["Poster Jam", "Logo Rush"]);

    let response = app
        .clone()
        .oneshot(request("GET", "/api/all-contests?category=All&sort=desc", None, None))
        .await
        .unwrap();
    let json = json_body(response).await;
    assert_eq!(json["data"]["total_count"], 3);
    assert_eq!(json["data"]["contests"][0]["name"], "Logo Rush");

    let response = app
        .clone()
        .oneshot(request("GET", "/api/all-contests?search=essay", None, None))
        .await
        .unwrap();
    let json = json_body(response).await;
    assert_eq!(json["data"]["total_count"], 1);
    assert_eq!(json["data"]["contests"][0]["name"], "Essay Cup");

    let response = app
        .oneshot(request("GET", "/api/all-contests?page=abc&size=-2", None, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["data"]["total_pages"], 1);
}

#[tokio::test]
#[serial]
async fn popular_contests_rank_by_participants() {
    let (app, state) = make_test_app().await;
    let db = state.db();
    let maker = create_user(db, "Maker", Role::Creator).await;
    let fan = create_user(db, "Fan", Role::User).await;
    let quiet = create_contest(db, &maker, "Quiet", ContestStatus::Accepted, 5).await;
    let busy = create_contest(db, &maker, "Busy", ContestStatus::Accepted, 5).await;
    create_participation(db, &busy, &fan, "pi_1").await;
    create_participation(db, &busy, &maker, "pi_2").await;
    create_participation(db, &quiet, &fan, "pi_3").await;

    let response = app
        .oneshot(request("GET", "/api/popular-contests", None, None))
        .await
        .unwrap();
    let json = json_body(response).await;
    assert_eq!(json["data"][0]["name"], "Busy");
    assert_eq!(json["data"][0]["participation_count"], 2);
    assert_eq!(json["data"][1]["name"], "Quiet");
}

#[tokio::test]
#[serial]
async fn stats_count_participants_contests_and_winners() {
    let (app, state) = make_test_app().await;
    let db = state.db();
    let admin = create_user(db, "Root", Role::Admin).await;
    let maker = create_user(db, "Maker", Role::Creator).await;
    let fan = create_user(db, "Fan", Role::User).await;
    let open = create_contest(db, &maker, "Open", ContestStatus::Accepted, 5).await;
    let done = create_contest(db, &maker, "Done", ContestStatus::Accepted, 5).await;
    create_contest(db, &maker, "Draft", ContestStatus::Pending, 5).await;
    create_participation(db, &open, &fan, "pi_1").await;
    create_participation(db, &done, &fan, "pi_2").await;
    ContestModel::declare_winner(db, done.id, &fan.email, &fan.name, None)
        .await
        .unwrap();

    let response = app
        .clone()
        .oneshot(request("GET", "/api/stats", None, None))
        .await
        .unwrap();
    let json = json_body(response).await;
    assert_eq!(json["data"]["total_participants"], 2);
    assert_eq!(json["data"]["total_contests"], 1);
    assert_eq!(json["data"]["total_winners"], 1);

    let response = app
        .oneshot(request("GET", "/api/admin-stats", Some(&token_for(&admin)), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["data"]["users"], 3);
    assert_eq!(json["data"]["contests"], 3);
    assert_eq!(json["data"]["revenue"], 20.0);
}

#[tokio::test]
#[serial]
async fn all_contests_survives_huge_page() {
    let (app, state) = make_test_app().await;
    let maker = create_user(state.db(), "Maker", Role::Creator).await;
    create_contest(state.db(), &maker, "Open", ContestStatus::Accepted, 5).await;

    for page in ["9223372036854775807", "18446744073709551615"] {
        let response = app
            .clone()
            .oneshot(request("GET", &format!("/api/all-contests?page={page}&size=100"), None, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK, "page {page}");
        assert_eq!(json_body(response).await["data"]["total_count"], 1);
    }
}

#[tokio::test]
#[serial]
async fn all_contests_search_matches_wildcards_literally() {
    let (app, state) = make_test_app().await;
    let maker = create_user(state.db(), "Maker", Role::Creator).await;
    create_contest(state.db(), &maker, "Logo Sprint", ContestStatus::Accepted, 5).await;
    create_contest(state.db(), &maker, "snake_case Cup", ContestStatus::Accepted, 5).await;

    let response = app
        .oneshot(request("GET", "/api/all-contests?search=_", None, None))
        .await
        .unwrap();
    let json = json_body(response).await;
    assert_eq!(json["data"]["total_count"], 1);
    assert_eq!(json["data"]["contests"][0]["name"], "snake_case Cup");
}
