//! Authorization code exchange at the token endpoint

use crate::errors::FlowError;
use crate::flow::client_auth::TokenRequest;
use crate::models::TokenResponse;
use http::header::{ACCEPT, CONTENT_TYPE};
use http::StatusCode;
use log::debug;
use reqwest::Client;

/// Error message used when the server sends an error without a description
pub(crate) const DEFAULT_UPSTREAM_ERROR: &str = "keycloak error";

/// Posts the token request and returns the access token.
///
/// Error statuses are not transport failures here: a 4xx with a JSON error
/// body is parsed like any other response.
pub async fn exchange_code(
    client: &Client,
    token_url: &str,
    request: &TokenRequest,
) -> Result<String, FlowError> {
    debug!("Exchanging authorization code at: {}", token_url);
    let response = client
        .post(token_url)
        .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
        .header(ACCEPT, "application/json")
        .body(request.encode())
        .send()
        .await
        .map_err(|e| FlowError::Unhandled(format!("Token request failed: {e}")))?;

    let status = response.status();
    let body = response
        .bytes()
        .await
        .map_err(|e| FlowError::Unhandled(format!("Failed to read token response: {e}")))?;

    let token_response: TokenResponse =
        serde_json::from_slice(&body).map_err(|e| FlowError::UpstreamAuth {
            status: error_status(status),
            message: format!("Failed to parse token response: {e}"),
        })?;

    access_token_from(status, token_response)
}

/// Interprets a parsed token response
pub fn access_token_from(status: StatusCode, response: TokenResponse) -> Result<String, FlowError> {
    if let Some(error) = response.error {
        let message = response
            .error_description
            .unwrap_or_else(|| DEFAULT_UPSTREAM_ERROR.to_string());
        debug!(
            "Authorization server returned '{}' with status {}: {}",
            error, status, message
        );
        return Err(FlowError::UpstreamAuth { status, message });
    }

    match response.access_token {
        Some(token) => Ok(token),
        None => Err(FlowError::UpstreamAuth {
            status: error_status(status),
            message: "Token response contained neither access_token nor error".to_string(),
        }),
    }
}

/// Keeps error statuses, replaces anything else with 502
fn error_status(status: StatusCode) -> StatusCode {
    if status.is_client_error() || status.is_server_error() {
        status
    } else {
        StatusCode::BAD_GATEWAY
    }
}
