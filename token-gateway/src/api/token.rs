use crate::errors::ApiError;
use crate::headers::presets;
use crate::models::ResourceRecord;
use crate::openapi::TOKEN_TAG;
use crate::state::AppState;
use axum::{
    extract::{RawQuery, State},
    response::{IntoResponse, Response},
    Json,
};
use http::{HeaderMap, StatusCode};

/// Exchanges an authorization code and returns the caller's resource record
#[utoipa::path(
    get,
    path = "/token",
    tag = TOKEN_TAG,
    params(
        ("code" = Option<String>, Query, description = "Authorization code"),
        ("code" = Option<String>, Header, description = "Authorization code, wins over the query parameter"),
    ),
    responses(
        (status = 200, description = "Resource record of the authenticated user", body = ResourceRecord),
        (status = 400, description = "Missing code or no client credential configured"),
        (status = "4XX", description = "Error reported by the authorization server"),
        (status = 500, description = "Any other failure")
    )
)]
pub(super) async fn token_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    RawQuery(query): RawQuery,
) -> Response {
    match state.orchestrator.run(&headers, query.as_deref()).await {
        Ok(record) => {
            let mut response = (StatusCode::OK, Json(record)).into_response();
            presets::no_store().apply(&mut response);
            response
        }
        Err(err) => ApiError::from(err).into_response(),
    }
}
