use api::{
    auth::{Role, generate_jwt},
    routes::routes,
    state::AppState,
};
use attendance::VerifierConfig;
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use common::config::AppConfig;
use serde_json::Value;
use tower::ServiceExt;

pub const TEST_JWT_SECRET: &str = "attendance-test-secret";

/// Router mounted under `/api` with a fresh, empty ledger and the default policy.
pub fn make_test_app() -> Router {
    make_test_app_with_state().0
}

/// Like [`make_test_app`], also handing back the state so tests can seed the ledger.
pub fn make_test_app_with_state() -> (Router, AppState) {
    AppConfig::set_jwt_secret(TEST_JWT_SECRET);
    AppConfig::set_jwt_duration_minutes(60);

    let state = AppState::new(VerifierConfig::default());
    let app = Router::new().nest("/api", routes(state.clone()));
    (app, state)
}

pub fn bearer(user_id: &str, role: Role) -> String {
    let (token, _) = generate_jwt(user_id, role).expect("token");
    format!("Bearer {token}")
}

/// Sends a request and returns the status with the parsed JSON body (`Null` if not JSON).
pub async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, json)
}
