use crate::config::http::HttpClientConfig;
use crate::config::oauth::OAuthConfig;
use crate::config::publish::PublishConfig;
use crate::config::resource::ResourceConfig;
use confique::Config;

pub mod http;
pub mod oauth;
pub mod publish;
pub mod resource;

/// Main configuration structure for the token gateway
///
/// Loaded once at startup and shared read-only between all requests.
#[derive(Debug, Config, Clone)]
pub struct GatewayConfig {
    /// The port the gateway will listen to (default: 8085)
    #[config(env = "GATEWAY_PORT", default = 8085)]
    pub port: u16,

    /// OAuth 2.0 client configuration
    #[config(nested)]
    pub oauth: OAuthConfig,

    /// Downstream resource API configuration
    #[config(nested)]
    pub resource: ResourceConfig,

    /// Outbound HTTP client configuration
    #[config(nested)]
    pub http: HttpClientConfig,

    /// Event publishing configuration
    #[config(nested)]
    pub publish: PublishConfig,
}

impl GatewayConfig {
    /// Creates a new config from environment variables, optionally layered
    /// over the TOML file named by `GATEWAY_CONFIG_FILE`
    pub fn new() -> Result<Self, confique::Error> {
        let mut builder = Self::builder().env();
        if let Ok(path) = std::env::var("GATEWAY_CONFIG_FILE") {
            builder = builder.file(path);
        }
        builder.load()
    }

    #[cfg(test)]
    pub fn for_test_with_mocks(
        auth_mock: &wiremock::MockServer,
        resource_mock: &wiremock::MockServer,
    ) -> Self {
        Self {
            port: 0, // Let the OS choose a port
            oauth: OAuthConfig {
                client_id: "finance-client".to_string(),
                client_secret: Some("test-secret".to_string()),
                private_key_path: None,
                key_id: None,
                redirect_uri: "http://localhost:8085/callback".to_string(),
                token_url: format!(
                    "{}/realms/finance-app/protocol/openid-connect/token",
                    auth_mock.uri()
                ),
                assertion_ttl: 300,
                cache_signing_key: false,
                signing_key_cache_ttl: 300,
            },
            resource: ResourceConfig {
                base_url: resource_mock.uri(),
                path: "/api/transactions".to_string(),
            },
            http: HttpClientConfig {
                timeout: 5,
                connect_timeout: 2,
            },
            publish: PublishConfig {
                enabled: false,
                topic: "user-transactions".to_string(),
                brokers: "localhost:9092".to_string(),
                message_timeout: 5000,
            },
        }
    }
}
