use std::sync::Arc;

use axum::{
    body::{self, Body},
    http::{Request, StatusCode, header},
};
use serde_json::{Value, json};
use tower::ServiceExt;

use todo_board::{
    auth::{
        JwtKeys,
        jwt::{encode_token, make_claims, now_unix},
    },
    config::AppConfig,
    db::store::MemoryTodoStore,
    routes::app,
    state::AppState,
    test_helpers::{TEST_SECRET, bearer, test_config, test_state},
};

async fn send(state: &Arc<AppState>, request: Request<Body>) -> (StatusCode, Value) {
    let response = app(state.clone()).oneshot(request).await.expect("router should respond");
    let status = response.status();
    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body should read");
    (status, serde_json::from_slice(&bytes).expect("body should be json"))
}

fn list_with(authorization: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri("/todos");
    if let Some(value) = authorization {
        builder = builder.header(header::AUTHORIZATION, value);
    }
    builder.body(Body::empty()).expect("request should build")
}

fn assert_unauthorized(status: StatusCode, body: &Value) {
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], json!("UNAUTHORIZED"));
    assert!(body["error"].get("details").is_none());
}

#[tokio::test]
async fn missing_header_is_unauthorized() {
    let state = test_state();
    let (status, body) = send(&state, list_with(None)).await;
    assert_unauthorized(status, &body);
}

#[tokio::test]
async fn non_bearer_scheme_is_unauthorized() {
    let state = test_state();
    let (status, body) = send(&state, list_with(Some("Basic YWxpY2U6cHc="))).await;
    assert_unauthorized(status, &body);
}

#[tokio::test]
async fn garbage_token_is_unauthorized() {
    let state = test_state();
    let (status, body) = send(&state, list_with(Some("Bearer not-a-jwt"))).await;
    assert_unauthorized(status, &body);
}

#[tokio::test]
async fn token_from_other_secret_is_unauthorized() {
    let state = test_state();
    let token = encode_token(
        &JwtKeys::from_secret(b"another-secret"),
        &make_claims("alice", 600),
    )
    .expect("token should encode");

    let (status, body) = send(&state, list_with(Some(&format!("Bearer {token}")))).await;
    assert_unauthorized(status, &body);
}

#[tokio::test]
async fn expired_token_is_unauthorized() {
    let state = test_state();
    let mut claims = make_claims("alice", 0);
    claims.exp = now_unix() - 600;
    let token = encode_token(&JwtKeys::from_secret(TEST_SECRET.as_bytes()), &claims)
        .expect("token should encode");

    let (status, body) = send(&state, list_with(Some(&format!("Bearer {token}")))).await;
    assert_unauthorized(status, &body);
}

#[tokio::test]
async fn valid_token_lists_callers_records() {
    let state = test_state();
    let (status, body) = send(&state, list_with(Some(&bearer("alice")))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn authentication_runs_before_body_validation() {
    let state = test_state();
    let request = Request::builder()
        .method("POST")
        .uri("/todos")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(json!({ "name": "" }).to_string()))
        .expect("request should build");

    let (status, body) = send(&state, request).await;
    assert_unauthorized(status, &body);
}

#[tokio::test]
async fn configured_audience_is_enforced() {
    let mut cfg: AppConfig = test_config();
    cfg.auth.audience = Some("authenticated".to_string());
    let state = AppState::new(&cfg.auth, Arc::new(MemoryTodoStore::new()));
    let keys = JwtKeys::from_secret(TEST_SECRET.as_bytes());

    let without_aud =
        encode_token(&keys, &make_claims("alice", 600)).expect("token should encode");
    let (status, body) = send(&state, list_with(Some(&format!("Bearer {without_aud}")))).await;
    assert_unauthorized(status, &body);

    let mut claims = make_claims("alice", 600);
    claims.aud = Some("authenticated".to_string());
    let with_aud = encode_token(&keys, &claims).expect("token should encode");
    let (status, _) = send(&state, list_with(Some(&format!("Bearer {with_aud}")))).await;
    assert_eq!(status, StatusCode::OK);
}
