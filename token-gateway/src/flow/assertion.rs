//! JWT client assertions for `private_key_jwt` client authentication (RFC 7523)
//!
//! An assertion is a short-lived RS256 JWT with:
//!
//! - `iss` and `sub`: the client id
//! - `aud`: the token endpoint URL
//! - `iat` / `exp`: now and now + the configured lifetime (300 seconds by default)
//! - `jti`: a random UUID, unique per assertion
//!
//! The private key is read from disk on every call unless the signing key
//! cache is enabled. Assertions themselves are never reused.

use crate::config::oauth::OAuthConfig;
use chrono::Utc;
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use log::debug;
use moka::future::Cache;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use uuid::Uuid;

/// Assertion type sent as `client_assertion_type`
pub const CLIENT_ASSERTION_TYPE: &str = "urn:ietf:params:oauth:client-assertion-type:jwt-bearer";

/// Errors that can occur while building a client assertion
#[derive(Debug, Error)]
pub enum AssertionError {
    #[error("Failed to read private key '{path}': {source}")]
    ReadKey {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid private key '{path}': {source}")]
    InvalidKey {
        path: String,
        #[source]
        source: jsonwebtoken::errors::Error,
    },
    #[error("Failed to sign client assertion: {0}")]
    Signing(#[source] jsonwebtoken::errors::Error),
}

/// Claims of a client assertion
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AssertionClaims {
    pub iss: String,
    pub sub: String,
    pub aud: String,
    pub iat: i64,
    pub exp: i64,
    pub jti: String,
}

impl AssertionClaims {
    /// Builds the claims for `client_id` targeting `audience`, issued at `now`
    pub fn new(client_id: &str, audience: &str, now: i64, ttl: u64) -> Self {
        Self {
            iss: client_id.to_string(),
            sub: client_id.to_string(),
            aud: audience.to_string(),
            iat: now,
            exp: now + ttl as i64,
            jti: Uuid::new_v4().to_string(),
        }
    }
}

/// Signs client assertions with the configured RSA private key
#[derive(Clone)]
pub struct AssertionSigner {
    ttl: u64,
    key_cache: Option<Cache<PathBuf, Arc<EncodingKey>>>,
}

impl AssertionSigner {
    /// Create a new signer from the OAuth configuration
    pub fn new(config: &OAuthConfig) -> Self {
        let key_cache = config.cache_signing_key.then(|| {
            Cache::builder()
                .max_capacity(4)
                .time_to_live(Duration::from_secs(config.signing_key_cache_ttl))
                .build()
        });
        Self {
            ttl: config.assertion_ttl,
            key_cache,
        }
    }

    /// Builds and signs a fresh assertion for `client_id` against `audience`
    pub async fn sign(
        &self,
        client_id: &str,
        audience: &str,
        key_path: &Path,
        key_id: Option<&str>,
    ) -> Result<String, AssertionError> {
        let key = self.signing_key(key_path).await?;
        let claims = AssertionClaims::new(client_id, audience, Utc::now().timestamp(), self.ttl);

        let mut header = Header::new(Algorithm::RS256);
        header.kid = key_id.map(str::to_string);

        let assertion =
            jsonwebtoken::encode(&header, &claims, &key).map_err(AssertionError::Signing)?;
        debug!(
            "Signed client assertion for '{}' (jti={}, kid={:?})",
            client_id, claims.jti, header.kid
        );
        Ok(assertion)
    }

    async fn signing_key(&self, key_path: &Path) -> Result<Arc<EncodingKey>, AssertionError> {
        let Some(cache) = &self.key_cache else {
            return load_key(key_path).await.map(Arc::new);
        };

        if let Some(key) = cache.get(key_path).await {
            return Ok(key);
        }
        let key = Arc::new(load_key(key_path).await?);
        cache.insert(key_path.to_path_buf(), key.clone()).await;
        debug!("Cached signing key from '{}'", key_path.display());
        Ok(key)
    }
}

/// Reads and parses a PEM encoded RSA private key (PKCS#1 or PKCS#8)
async fn load_key(key_path: &Path) -> Result<EncodingKey, AssertionError> {
    let pem = tokio::fs::read(key_path)
        .await
        .map_err(|source| AssertionError::ReadKey {
            path: key_path.display().to_string(),
            source,
        })?;
    EncodingKey::from_rsa_pem(&pem).map_err(|source| AssertionError::InvalidKey {
        path: key_path.display().to_string(),
        source,
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use jsonwebtoken::{DecodingKey, Validation};

    const CLIENT_ID: &str = "finance-client";
    const TOKEN_URL: &str = "http://localhost:8080/realms/finance-app/protocol/openid-connect/token";

    pub(crate) fn private_key_path() -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("testdata/keys/private_key.pem")
    }

    /// Verifies `assertion` with the test public key and returns its claims
    pub(crate) fn verify_assertion(assertion: &str, audience: &str) -> AssertionClaims {
        let public_pem = std::fs::read(
            Path::new(env!("CARGO_MANIFEST_DIR")).join("testdata/keys/public_key.pem"),
        )
        .expect("Failed to read test public key");
        let key = DecodingKey::from_rsa_pem(&public_pem).expect("Invalid test public key");
        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_audience(&[audience]);
        validation.set_required_spec_claims(&["exp", "iss", "sub", "aud"]);
        jsonwebtoken::decode::<AssertionClaims>(assertion, &key, &validation)
            .expect("Assertion failed verification")
            .claims
    }

    fn test_config(cache_signing_key: bool) -> OAuthConfig {
        OAuthConfig {
            client_id: CLIENT_ID.to_string(),
            client_secret: None,
            private_key_path: Some(private_key_path().display().to_string()),
            key_id: None,
            redirect_uri: "http://localhost/callback".to_string(),
            token_url: TOKEN_URL.to_string(),
            assertion_ttl: 300,
            cache_signing_key,
            signing_key_cache_ttl: 60,
        }
    }

    #[test]
    fn test_claims_lifetime() {
        let claims = AssertionClaims::new(CLIENT_ID, TOKEN_URL, 1_700_000_000, 300);
        assert_eq!(claims.iss, CLIENT_ID);
        assert_eq!(claims.sub, CLIENT_ID);
        assert_eq!(claims.aud, TOKEN_URL);
        assert_eq!(claims.exp - claims.iat, 300);
        assert!(Uuid::parse_str(&claims.jti).is_ok());
    }

    #[tokio::test]
    async fn test_builds_signed_client_assertion_with_required_claims() {
        let signer = AssertionSigner::new(&test_config(false));
        let assertion = signer
            .sign(CLIENT_ID, TOKEN_URL, &private_key_path(), Some("test-kid"))
            .await
            .expect("Failed to sign assertion");

        let header = jsonwebtoken::decode_header(&assertion).unwrap();
        assert_eq!(header.alg, Algorithm::RS256);
        assert_eq!(header.kid.as_deref(), Some("test-kid"));

        let claims = verify_assertion(&assertion, TOKEN_URL);
        assert_eq!(claims.iss, CLIENT_ID);
        assert_eq!(claims.sub, CLIENT_ID);
        assert_eq!(claims.aud, TOKEN_URL);
        assert_eq!(claims.exp - claims.iat, 300);
        assert!(claims.exp > Utc::now().timestamp());
    }

    #[tokio::test]
    async fn test_no_kid_header_without_key_id() {
        let signer = AssertionSigner::new(&test_config(false));
        let assertion = signer
            .sign(CLIENT_ID, TOKEN_URL, &private_key_path(), None)
            .await
            .unwrap();
        let header = jsonwebtoken::decode_header(&assertion).unwrap();
        assert_eq!(header.kid, None);
    }

    #[tokio::test]
    async fn test_every_assertion_has_a_fresh_jti() {
        for cache_signing_key in [false, true] {
            let signer = AssertionSigner::new(&test_config(cache_signing_key));
            let first = signer
                .sign(CLIENT_ID, TOKEN_URL, &private_key_path(), None)
                .await
                .unwrap();
            let second = signer
                .sign(CLIENT_ID, TOKEN_URL, &private_key_path(), None)
                .await
                .unwrap();
            assert_ne!(
                verify_assertion(&first, TOKEN_URL).jti,
                verify_assertion(&second, TOKEN_URL).jti
            );
        }
    }

    #[tokio::test]
    async fn test_cached_key_is_reused() {
        let signer = AssertionSigner::new(&test_config(true));
        signer
            .sign(CLIENT_ID, TOKEN_URL, &private_key_path(), None)
            .await
            .unwrap();
        let cache = signer.key_cache.as_ref().unwrap();
        assert!(cache.get(private_key_path().as_path()).await.is_some());
    }

    #[tokio::test]
    async fn test_missing_key_file() {
        let signer = AssertionSigner::new(&test_config(false));
        let result = signer
            .sign(CLIENT_ID, TOKEN_URL, Path::new("/nonexistent/key.pem"), None)
            .await;
        assert!(matches!(result, Err(AssertionError::ReadKey { .. })));
    }

    #[tokio::test]
    async fn test_invalid_key_file() {
        // Readable, but not PEM
        let signer = AssertionSigner::new(&test_config(false));
        let not_a_key = Path::new(env!("CARGO_MANIFEST_DIR")).join("Cargo.toml");
        let result = signer.sign(CLIENT_ID, TOKEN_URL, &not_a_key, None).await;
        assert!(matches!(result, Err(AssertionError::InvalidKey { .. })));
    }
}
