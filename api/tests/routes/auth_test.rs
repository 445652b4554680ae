use crate::helpers::{
    fixtures::{PASSWORD, create_user, json_body, request, token_for},
    make_test_app,
};
use axum::http::StatusCode;
use db::models::user::Role;
use serde_json::json;
use serial_test::serial;
use tower::ServiceExt;

#[tokio::test]
#[serial]
async fn login_returns_token_for_valid_credentials() {
    let (app, state) = make_test_app().await;
    let user = create_user(state.db(), "Ada", Role::Creator).await;

    let body = json!({ "email": user.email, "password": PASSWORD });
    let response = app
        .clone()
        .oneshot(request("POST", "/api/auth/login", None, Some(body)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = json_body(response).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["data"]["email"], "ada@test.com");
    assert_eq!(json["data"]["role"], "creator");
    let token = json["data"]["token"].as_str().unwrap().to_string();
    assert!(!token.is_empty());
    assert!(json["data"]["expires_at"].is_string());

    let me = app
        .oneshot(request("GET", "/api/auth/me", Some(&token), None))
        .await
        .unwrap();
    assert_eq!(me.status(), StatusCode::OK);
    let me = json_body(me).await;
    assert_eq!(me["data"]["id"], user.id);
    assert_eq!(me["data"]["win_count"], 0);
    assert!(me["data"].get("password_hash").is_none());
}

#[tokio::test]
#[serial]
async fn login_rejects_wrong_password() {
    let (app, state) = make_test_app().await;
    let user = create_user(state.db(), "Ada", Role::User).await;

    let body = json!({ "email": user.email, "password": "wrong-password" });
    let response = app
        .oneshot(request("POST", "/api/auth/login", None, Some(body)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let json = json_body(response).await;
    assert_eq!(json["success"], false);
    assert_eq!(json["message"], "Invalid email or password");
}

#[tokio::test]
#[serial]
async fn login_rejects_unknown_email() {
    let (app, _) = make_test_app().await;

    let body = json!({ "email": "ghost@test.com", "password": PASSWORD });
    let response = app
        .oneshot(request("POST", "/api/auth/login", None, Some(body)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[serial]
async fn me_returns_profile_of_token_owner() {
    let (app, state) = make_test_app().await;
    let user = create_user(state.db(), "Lin", Role::User).await;

    let response = app
        .oneshot(request("GET", "/api/auth/me", Some(&token_for(&user)), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = json_body(response).await;
    assert_eq!(json["data"]["name"], "Lin");
    assert_eq!(json["data"]["role"], "user");
}

#[tokio::test]
#[serial]
async fn login_ignores_email_case() {
    let (app, state) = make_test_app().await;
    create_user(state.db(), "Ada", Role::User).await;

    let response = app
        .oneshot(request(
            "POST",
            "/api/auth/login",
            None,
            Some(json!({ "email": "ADA@test.com", "password": PASSWORD })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["data"]["email"], "ada@test.com");
}
