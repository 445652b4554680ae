use super::payments::FakeGateway;
use api::{auth::middleware::log_request, routes::app, state::AppState};
use axum::{Router, middleware::from_fn};
use db::test_utils::setup_test_db;
use std::sync::Arc;
use util::config::AppConfig;

pub const TEST_CLIENT_URL: &str = "http://client.test";

fn configure_for_tests() {
    AppConfig::set_env("test");
    AppConfig::set_jwt_secret("test-secret");
    AppConfig::set_jwt_duration_minutes(60u64);
    AppConfig::set_client_url(TEST_CLIENT_URL);
    AppConfig::set_payment_currency("usd");
}

/// Router over a fresh in-memory database and a fake payment gateway.
pub async fn make_test_app() -> (Router, AppState) {
    let (router, state, _) = make_test_app_with_gateway().await;
    (router, state)
}

/// Like [`make_test_app`], also handing back the fake gateway for seeding
/// sessions and inspecting checkout requests.
pub async fn make_test_app_with_gateway() -> (Router, AppState, Arc<FakeGateway>) {
    configure_for_tests();

    let db = setup_test_db().await;
    let gateway = Arc::new(FakeGateway::default());
    let app_state = AppState::new(db, gateway.clone());

    let router = app(app_state.clone()).layer(from_fn(log_request));

    (router, app_state, gateway)
}
