use crate::openapi::HEALTH_TAG;
use axum::Json;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Basic health check response
#[derive(Debug, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct Health {
    status: String,
}

/// Basic health check handler
#[utoipa::path(
    get,
    path = "/api/health",
    tag = HEALTH_TAG,
    responses(
        (status = 200, description = "Service is up", body = Health)
    )
)]
pub(super) async fn health_check() -> Json<Health> {
    Json(Health {
        status: "UP".to_string(),
    })
}
