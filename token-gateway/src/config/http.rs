use confique::Config;

/// Timeouts for the outbound HTTP client
#[derive(Debug, Config, Clone)]
pub struct HttpClientConfig {
    /// Total request timeout in seconds (default: 10)
    #[config(env = "GATEWAY_HTTP_TIMEOUT", default = 10)]
    pub timeout: u64,

    /// Connection timeout in seconds (default: 2)
    #[config(env = "GATEWAY_HTTP_CONNECT_TIMEOUT", default = 2)]
    pub connect_timeout: u64,
}
