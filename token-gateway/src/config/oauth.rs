//! OAuth 2.0 client configuration

use confique::Config;

/// OAuth 2.0 client configuration used against the authorization server
#[derive(Debug, Config, Clone)]
pub struct OAuthConfig {
    /// Client identifier registered at the authorization server
    #[config(env = "GATEWAY_OAUTH_CLIENT_ID")]
    pub client_id: String,

    /// Shared client secret (optional, used when no private key is readable)
    #[config(env = "GATEWAY_OAUTH_CLIENT_SECRET")]
    pub client_secret: Option<String>,

    /// Path to a PEM encoded RSA private key for `private_key_jwt` client authentication
    #[config(env = "GATEWAY_OAUTH_PRIVATE_KEY_PATH")]
    pub private_key_path: Option<String>,

    /// Key identifier placed in the `kid` header of the client assertion
    #[config(env = "GATEWAY_OAUTH_KEY_ID")]
    pub key_id: Option<String>,

    /// Redirect URI sent along with the authorization code
    #[config(env = "GATEWAY_OAUTH_REDIRECT_URI")]
    pub redirect_uri: String,

    /// Token endpoint of the authorization server
    #[config(env = "GATEWAY_OAUTH_TOKEN_URL")]
    pub token_url: String,

    /// Lifetime of a client assertion in seconds (default: 300)
    #[config(env = "GATEWAY_OAUTH_ASSERTION_TTL", default = 300)]
    pub assertion_ttl: u64,

    /// Keep the parsed signing key in memory between requests (default: false)
    #[config(env = "GATEWAY_OAUTH_CACHE_SIGNING_KEY", default = false)]
    pub cache_signing_key: bool,

    /// How long a cached signing key stays valid in seconds (default: 300)
    #[config(env = "GATEWAY_OAUTH_SIGNING_KEY_CACHE_TTL", default = 300)]
    pub signing_key_cache_ttl: u64,
}

impl OAuthConfig {
    /// Returns the client secret if one is configured and not blank
    pub fn usable_client_secret(&self) -> Option<&str> {
        self.client_secret
            .as_deref()
            .filter(|secret| !secret.trim().is_empty())
    }

    /// Returns the key id if one is configured and not blank
    pub fn usable_key_id(&self) -> Option<&str> {
        self.key_id.as_deref().filter(|kid| !kid.trim().is_empty())
    }
}
