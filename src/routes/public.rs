use axum::{Router, routing::get};
use serde::Serialize;

use crate::response::{ApiResult, JsonApiResponse};

pub fn router() -> Router {
    Router::new().route("/health", get(health))
}

#[derive(Debug, Serialize)]
struct Health {
    ok: bool,
}

async fn health() -> ApiResult<Health> {
    JsonApiResponse::ok(Health { ok: true })
}
