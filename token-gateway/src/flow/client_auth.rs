//! Client authentication against the authorization server token endpoint
//!
//! Mode selection, in order:
//! 1. A readable private key file: `private_key_jwt` with a signed assertion
//! 2. A non-blank client secret: `client_secret_post`
//! 3. Neither: the request fails before any network I/O

use crate::config::oauth::OAuthConfig;
use crate::errors::FlowError;
use crate::flow::assertion::{AssertionSigner, CLIENT_ASSERTION_TYPE};
use log::{debug, info, warn};
use std::path::{Path, PathBuf};
use tokio::fs;
use url::form_urlencoded;

/// How the gateway authenticates itself at the token endpoint
#[derive(Debug, Clone, PartialEq)]
pub enum ClientCredentialMode {
    SharedSecret(String),
    PrivateKeyAssertion { key_path: PathBuf },
}

/// Form body of an `authorization_code` token request
#[derive(Debug, Clone, PartialEq)]
pub struct TokenRequest {
    fields: Vec<(&'static str, String)>,
}

impl TokenRequest {
    fn new(code: &str, config: &OAuthConfig) -> Self {
        Self {
            fields: vec![
                ("grant_type", "authorization_code".to_string()),
                ("code", code.to_string()),
                ("client_id", config.client_id.clone()),
                ("redirect_uri", config.redirect_uri.clone()),
            ],
        }
    }

    fn push(&mut self, name: &'static str, value: impl Into<String>) {
        self.fields.push((name, value.into()));
    }

    /// Returns the value of a form field
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(field, _)| *field == name)
            .map(|(_, value)| value.as_str())
    }

    /// Encodes the fields as `application/x-www-form-urlencoded`
    pub fn encode(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (name, value) in &self.fields {
            serializer.append_pair(name, value);
        }
        serializer.finish()
    }
}

/// Builds authenticated token requests
#[derive(Clone)]
pub struct ClientAuthenticator {
    signer: AssertionSigner,
}

impl ClientAuthenticator {
    pub fn new(config: &OAuthConfig) -> Self {
        Self {
            signer: AssertionSigner::new(config),
        }
    }

    /// Picks the credential mode from the configuration
    pub async fn select_mode(
        &self,
        config: &OAuthConfig,
    ) -> Result<ClientCredentialMode, FlowError> {
        if let Some(raw) = config.private_key_path.as_deref() {
            if let Some(key_path) = resolve_readable_key(raw).await {
                return Ok(ClientCredentialMode::PrivateKeyAssertion { key_path });
            }
        }
        if let Some(secret) = config.usable_client_secret() {
            return Ok(ClientCredentialMode::SharedSecret(secret.to_string()));
        }
        debug!("No usable client credential configured");
        Err(FlowError::MissingCredentials)
    }

    /// Builds the token request form for `code`
    pub async fn build_request(
        &self,
        config: &OAuthConfig,
        code: &str,
    ) -> Result<TokenRequest, FlowError> {
        let mode = self.select_mode(config).await?;
        let mut request = TokenRequest::new(code, config);

        match mode {
            ClientCredentialMode::PrivateKeyAssertion { key_path } => {
                let assertion = self
                    .signer
                    .sign(
                        &config.client_id,
                        &config.token_url,
                        &key_path,
                        config.usable_key_id(),
                    )
                    .await?;
                request.push("client_assertion_type", CLIENT_ASSERTION_TYPE);
                request.push("client_assertion", assertion);
                info!("Token request ready (private_key_jwt), client_assertion=***");
            }
            ClientCredentialMode::SharedSecret(secret) => {
                request.push("client_secret", secret);
                info!("Token request ready (client_secret)");
            }
        }

        Ok(request)
    }
}

/// Returns the first readable candidate for a configured key path.
///
/// Tried in order: the raw path, its absolute form, and the path resolved
/// against the working directory.
pub async fn resolve_readable_key(raw: &str) -> Option<PathBuf> {
    if raw.trim().is_empty() {
        return None;
    }
    let path = Path::new(raw);
    let mut candidates = vec![path.to_path_buf()];
    match std::path::absolute(path) {
        Ok(absolute) => candidates.push(absolute),
        Err(e) => warn!("Private key path check failed for '{}': {}", raw, e),
    }
    if let Ok(cwd) = std::env::current_dir() {
        candidates.push(cwd.join(path));
    }

    let mut readable = None;
    for candidate in candidates {
        if is_readable(&candidate).await {
            readable = Some(candidate);
            break;
        }
    }
    info!(
        "Private key path check: raw='{}', resolved={:?}, readable={}",
        raw,
        readable,
        readable.is_some()
    );
    readable
}

async fn is_readable(path: &Path) -> bool {
    let is_file = fs::metadata(path)
        .await
        .is_ok_and(|metadata| metadata.is_file());
    is_file && fs::File::open(path).await.is_ok()
}
