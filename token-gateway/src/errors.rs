use crate::flow::assertion::AssertionError;
use crate::flow::claims::ClaimsError;
use crate::publisher::PublishError;
use axum::response::IntoResponse;
use axum::Json;
use http::StatusCode;
use log::Level;
use serde_json::json;
use thiserror::Error;

/// Message returned when neither a private key nor a client secret is usable
pub(crate) const MISSING_CREDENTIALS: &str =
    "Missing credentials: no private key (oauth.private_key_path/key_id) and no client_secret";

#[derive(Debug, Clone)]
pub struct ApiError {
    pub message: String,
    pub status_code: StatusCode,
}

impl ApiError {
    /// Create a new ApiError with a message and status code
    pub fn new<S: ToString>(message: S, status_code: StatusCode) -> Self {
        Self {
            message: message.to_string(),
            status_code,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status_code = self.status_code;
        let body = json!({
            "error": self.message,
        });
        (status_code, Json(body)).into_response()
    }
}

/// Errors that terminate the token flow
#[derive(Debug, Error)]
pub enum FlowError {
    #[error("missing 'code' query param")]
    MissingCode,
    #[error("{}", MISSING_CREDENTIALS)]
    MissingCredentials,
    /// The authorization server answered with an error, or with something
    /// that is neither an error nor a token
    #[error("{message}")]
    UpstreamAuth { status: StatusCode, message: String },
    #[error(transparent)]
    TokenFormat(#[from] ClaimsError),
    #[error("Cannot find userId")]
    IdentityResolution,
    #[error("Resource request failed: {0}")]
    UpstreamResource(String),
    #[error(transparent)]
    Assertion(#[from] AssertionError),
    #[error(transparent)]
    Publish(#[from] PublishError),
    #[error("{0}")]
    Unhandled(String),
}

impl FlowError {
    /// HTTP status the failure is reported with
    pub fn status_code(&self) -> StatusCode {
        match self {
            FlowError::MissingCode | FlowError::MissingCredentials => StatusCode::BAD_REQUEST,
            FlowError::UpstreamAuth { status, .. }
                if status.is_client_error() || status.is_server_error() =>
            {
                *status
            }
            FlowError::UpstreamAuth { .. } => StatusCode::BAD_GATEWAY,
            // Any other failure echoes its message with a generic status
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Client-caused failures are warnings, everything else is an error
    pub fn log_level(&self) -> Level {
        if self.status_code().is_client_error() {
            Level::Warn
        } else {
            Level::Error
        }
    }
}

impl From<FlowError> for ApiError {
    fn from(err: FlowError) -> Self {
        let status_code = err.status_code();
        match err {
            FlowError::UpstreamAuth { message, .. } => ApiError::new(message, status_code),
            other => ApiError::new(other.to_string(), status_code),
        }
    }
}
