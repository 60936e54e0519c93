use confique::Config;

/// Event publishing configuration
#[derive(Debug, Config, Clone)]
pub struct PublishConfig {
    /// Publish the merged user + resource record (default: false)
    #[config(env = "GATEWAY_PUBLISH_ENABLED", default = false)]
    pub enabled: bool,

    /// Topic the merged record is published to (default: user-transactions)
    #[config(env = "GATEWAY_PUBLISH_TOPIC", default = "user-transactions")]
    pub topic: String,

    /// Comma-separated list of bootstrap brokers (default: localhost:9092)
    #[config(env = "GATEWAY_PUBLISH_BROKERS", default = "localhost:9092")]
    pub brokers: String,

    /// Delivery timeout for a single message in milliseconds (default: 5000)
    #[config(env = "GATEWAY_PUBLISH_MESSAGE_TIMEOUT", default = 5000)]
    pub message_timeout: u64,
}
