use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;

/// Envelope returned by the authorization server token endpoint
///
/// Either `access_token` or `error` is expected to be set. Unknown fields
/// (`token_type`, `expires_in`, ...) are ignored.
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq, Default)]
pub struct TokenResponse {
    /// Access token issued for the authorization code
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    /// OAuth 2.0 error code
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Human readable error description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_description: Option<String>,
}

/// Identity claims read from the access token payload
///
/// The signature of the token is never verified; these values are only as
/// trustworthy as the channel the token came from. The registered `sub`
/// claim is read by the decoder when `subject` is absent.
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq, Default)]
pub struct Claims {
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default, rename = "preferred_username")]
    pub preferred_username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default, rename = "iss")]
    pub issuer: Option<String>,
    #[serde(default, rename = "exp")]
    pub expires_at: Option<i64>,
}

/// Caller scoped record returned by the resource API
///
/// Transactions are opaque to the gateway and passed through unchanged, as
/// are any top-level fields the gateway does not know about.
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ResourceRecord {
    /// Owner of the record, if the resource API reports one
    #[serde(default)]
    pub user_id: Option<String>,
    /// Ordered list of transactions
    #[serde(default)]
    #[schema(value_type = Vec<Object>)]
    pub transactions: Vec<Value>,
    /// Number of transactions, if reported
    #[serde(default)]
    pub count: Option<i64>,
    /// Any other fields of the downstream response
    #[serde(flatten)]
    #[schema(value_type = Object)]
    pub extra: Map<String, Value>,
}

/// Record published to the event topic
///
/// Only built once an owner id has been resolved, so `user_id` is always set.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EventPayload {
    pub user_id: String,
    pub user: Claims,
    pub transactions: Vec<Value>,
}
