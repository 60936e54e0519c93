//! Identity claims from the access token payload
//!
//! The token signature is not checked. The token was just received from the
//! authorization server over the gateway's own connection.

use crate::models::Claims;
use base64::{engine::general_purpose::URL_SAFE, Engine as _};
use log::debug;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

/// Errors that can occur while decoding token claims
#[derive(Debug, Error)]
pub enum ClaimsError {
    #[error("Invalid JWT format")]
    InvalidFormat,
    #[error("Invalid JWT payload encoding: {0}")]
    Encoding(#[from] base64::DecodeError),
    #[error("Invalid JWT payload: {0}")]
    Json(#[from] serde_json::Error),
}

/// Decodes the claims carried in the payload segment of `token`
pub fn decode_claims(token: &str) -> Result<Claims, ClaimsError> {
    let token = token.trim();
    if !token.contains('.') {
        return Err(ClaimsError::InvalidFormat);
    }

    let payload = token
        .splitn(3, '.')
        .nth(1)
        .ok_or(ClaimsError::InvalidFormat)?;
    let bytes = decode_segment(payload)?;

    let tree: Value = serde_json::from_slice(&bytes)?;
    let mut claims = Claims::deserialize(&tree)?;
    if claims.subject.is_none() {
        claims.subject = string_claim(&tree, &["sub"]);
    }
    if claims.preferred_username.is_none() {
        claims.preferred_username = string_claim(&tree, &["preferredUsername", "username"]);
    }

    debug!(
        "Decoded token claims: subject={:?}, issuer={:?}",
        claims.subject, claims.issuer
    );
    Ok(claims)
}

/// Base64url decodes a segment, padding it to a multiple of 4 first
pub fn decode_segment(segment: &str) -> Result<Vec<u8>, base64::DecodeError> {
    let mut padded = segment.trim_end_matches('=').to_string();
    while padded.len() % 4 != 0 {
        padded.push('=');
    }
    URL_SAFE.decode(padded)
}

/// Returns the first string value found under `keys`
fn string_claim(tree: &Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .find_map(|key| tree.get(key).and_then(Value::as_str))
        .map(str::to_string)
}
