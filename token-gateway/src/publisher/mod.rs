//! Publishing of the merged user and resource record

use crate::config::publish::PublishConfig;
use crate::models::EventPayload;
use async_trait::async_trait;
use log::{debug, info};
use std::sync::Arc;
use thiserror::Error;

#[cfg(feature = "kafka")]
pub mod kafka;

#[derive(Debug, Error)]
pub enum PublishError {
    #[error("Failed to serialize event payload: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Failed to publish to topic '{topic}': {message}")]
    Delivery { topic: String, message: String },
    #[error("Event broker is not available: {0}")]
    Unavailable(String),
}

/// Destination for serialized events
#[async_trait]
pub trait EventBroker: Send + Sync {
    /// Sends `payload` to `topic` and waits for the broker to acknowledge it
    async fn publish(&self, topic: &str, payload: Vec<u8>) -> Result<(), PublishError>;
}

/// Broker used when publishing is switched off
pub struct DisabledBroker;

#[async_trait]
impl EventBroker for DisabledBroker {
    async fn publish(&self, topic: &str, _payload: Vec<u8>) -> Result<(), PublishError> {
        Err(PublishError::Unavailable(format!(
            "publishing is disabled, dropped event for topic '{topic}'"
        )))
    }
}

/// Serializes event payloads and hands them to the configured broker
#[derive(Clone)]
pub struct EventPublisher {
    enabled: bool,
    topic: String,
    broker: Arc<dyn EventBroker>,
}

impl EventPublisher {
    pub fn new(enabled: bool, topic: impl Into<String>, broker: Arc<dyn EventBroker>) -> Self {
        Self {
            enabled,
            topic: topic.into(),
            broker,
        }
    }

    /// Builds the publisher for the configured broker
    pub fn from_config(config: &PublishConfig) -> Result<Self, PublishError> {
        if !config.enabled {
            info!("Event publishing is disabled");
            return Ok(Self::new(false, &config.topic, Arc::new(DisabledBroker)));
        }
        let broker = Self::connect(config)?;
        info!(
            "Event publishing enabled, topic '{}' on {}",
            config.topic, config.brokers
        );
        Ok(Self::new(true, &config.topic, broker))
    }

    #[cfg(feature = "kafka")]
    fn connect(config: &PublishConfig) -> Result<Arc<dyn EventBroker>, PublishError> {
        Ok(Arc::new(kafka::KafkaBroker::new(config)?))
    }

    #[cfg(not(feature = "kafka"))]
    fn connect(_config: &PublishConfig) -> Result<Arc<dyn EventBroker>, PublishError> {
        Err(PublishError::Unavailable(
            "publishing is enabled but the gateway was built without the 'kafka' feature"
                .to_string(),
        ))
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// Publishes the payload as JSON; a no-op when publishing is disabled
    pub async fn publish(&self, payload: &EventPayload) -> Result<(), PublishError> {
        if !self.enabled {
            debug!("Publishing disabled, skipping event for {}", payload.user_id);
            return Ok(());
        }
        let bytes = serde_json::to_vec(payload)?;
        self.broker.publish(&self.topic, bytes).await?;
        info!(
            "Published {} transactions for user {} to '{}'",
            payload.transactions.len(),
            payload.user_id,
            self.topic
        );
        Ok(())
    }
}
