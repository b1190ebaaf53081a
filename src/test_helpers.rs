//! Builders shared by unit and integration tests.

use std::sync::Arc;

use axum::Router;

use crate::{
    auth::jwt::{JwtKeys, encode_token, make_claims},
    config::AppConfig,
    db::store::MemoryTodoStore,
    routes::app,
    state::AppState,
};

pub const TEST_SECRET: &str = "test-secret-for-todo-board";

pub fn test_config() -> AppConfig {
    let mut cfg = AppConfig::default();
    cfg.auth.jwt_secret = TEST_SECRET.to_string();
    cfg.auth.leeway_secs = 0;
    cfg
}

pub fn test_state() -> Arc<AppState> {
    AppState::new(&test_config().auth, Arc::new(MemoryTodoStore::new()))
}

/// Full application router backed by a fresh memory store.
pub fn test_router() -> Router {
    app(test_state())
}

pub fn token_for(owner_id: &str) -> String {
    encode_token(
        &JwtKeys::from_secret(TEST_SECRET.as_bytes()),
        &make_claims(owner_id, 3_600),
    )
    .unwrap_or_default()
}

pub fn bearer(owner_id: &str) -> String {
    format!("Bearer {}", token_for(owner_id))
}
